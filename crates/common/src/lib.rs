//! Pieces shared by the server crate and the binary: logging bootstrap,
//! probe payloads and the prometheus registry.

pub mod types;
pub mod utils;
pub mod metrics;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok(1.5);
        assert_eq!(h.status, "OK");
        assert_eq!(h.uptime, 1.5);
    }

    #[test]
    fn db_status_labels() {
        assert_eq!(types::DbStatus::new(true).database, "Connected");
        assert_eq!(types::DbStatus::new(false).database, "Disconnected");
    }
}
