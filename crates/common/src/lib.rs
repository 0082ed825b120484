pub mod env;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_without_error_when_connected() {
        let h = types::Health::connected();
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v, serde_json::json!({"status": "OK", "mongodb": "Connected"}));
    }

    #[test]
    fn health_carries_error_when_disconnected() {
        let h = types::Health::disconnected("ping failed");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["status"], "Error");
        assert_eq!(v["mongodb"], "Disconnected");
        assert_eq!(v["error"], "ping failed");
    }

    #[test]
    fn delete_result_is_camel_case() {
        let d = types::DeleteResult { message: "gone".into(), deleted_count: 1 };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["deletedCount"], 1);
    }
}
