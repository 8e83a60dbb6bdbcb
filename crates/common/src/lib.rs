pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn health_serializes_status() {
        let json = serde_json::to_value(types::Health::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn log_format_parses_json_case_insensitively() {
        assert_eq!(utils::logging::LogFormat::from_env_value(Some("JSON")), utils::logging::LogFormat::Json);
        assert_eq!(utils::logging::LogFormat::from_env_value(Some("pretty")), utils::logging::LogFormat::Compact);
        assert_eq!(utils::logging::LogFormat::from_env_value(None), utils::logging::LogFormat::Compact);
    }
}
