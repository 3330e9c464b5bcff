/// Files at or above this size (1 MiB) never reach the model.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

pub fn exceeds_limit(size_bytes: u64) -> bool {
    size_bytes >= MAX_FILE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(!exceeds_limit(0));
        assert!(!exceeds_limit(MAX_FILE_SIZE - 1));
        assert!(exceeds_limit(MAX_FILE_SIZE));
        assert!(exceeds_limit(2 * MAX_FILE_SIZE));
    }
}
