//! Tests for the ring buffer pointer protocol

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::error::ShmRingError;
    use crate::memory::BackingType;
    use crate::ring::{RingBuffer, RingConfig, Role};

    fn ring_config(dir: &TempDir, name: &str, item_size: usize, length: usize) -> RingConfig {
        RingConfig::new(name)
            .with_item_size(item_size)
            .with_length(length)
            .with_backing_type(BackingType::FileBacked)
            .with_file_path(dir.path().join(name))
    }

    fn pair(dir: &TempDir, name: &str, item_size: usize, length: usize) -> (RingBuffer, RingBuffer) {
        let writer =
            RingBuffer::new(ring_config(dir, name, item_size, length).with_create(true)).unwrap();
        let reader = RingBuffer::new(ring_config(dir, name, item_size, length)).unwrap();
        (writer, reader)
    }

    #[test]
    fn test_push_then_pop() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "basic", 1, 2);

        writer.push(10).unwrap();
        assert_eq!(reader.pop().unwrap(), Some(10));
    }

    #[test]
    fn test_pop_empty_returns_none() {
        let dir = TempDir::new().unwrap();
        let (_writer, mut reader) = pair(&dir, "empty", 1, 2);

        assert_eq!(reader.pop().unwrap(), None);
        assert!(reader.pop_many(4).unwrap().is_empty());
    }

    #[test]
    fn test_fifo_order_within_capacity() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "fifo", 4, 8);

        for i in 1..=7 {
            writer.push(i).unwrap();
        }
        assert_eq!(reader.pop_many(7).unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(reader.pop().unwrap(), None);
    }

    #[test]
    fn test_overwrite_discards_oldest() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "overwrite", 1, 2);

        writer.push(10).unwrap();
        writer.push(10).unwrap();
        writer.push(50).unwrap();

        // Third push overwrote the oldest slot; the newest value comes first
        assert_eq!(reader.pop().unwrap(), Some(50));
        assert!(reader.pop_many(3).unwrap().is_empty());
    }

    #[test]
    fn test_multi_byte_items() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "wide", 3, 2);

        writer.push(10).unwrap();
        assert_eq!(reader.pop().unwrap(), Some(10));

        writer.push(500).unwrap();
        assert_eq!(reader.pop().unwrap(), Some(500));
    }

    #[test]
    fn test_wide_pointer_drain() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "wideptr", 4, 128);

        for i in 0..127 {
            writer.push(i).unwrap();
        }
        let items = reader.pop_many(127).unwrap();
        assert_eq!(items.len(), 127);
        assert_eq!(items, (0..127).collect::<Vec<u64>>());
    }

    #[test]
    fn test_usage_checkpoints() {
        let dir = TempDir::new().unwrap();
        let (mut writer, reader) = pair(&dir, "usage", 1, 4);

        assert_eq!(reader.usage(), 0);
        writer.push(1).unwrap();
        assert_eq!(reader.usage(), 1);
        writer.push(2).unwrap();
        writer.push(3).unwrap();
        assert_eq!(reader.usage(), 3);
    }

    #[test]
    fn test_usage_accounts_for_wraparound() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "wrap", 4, 128);

        for _ in 0..127 {
            writer.push(10).unwrap();
        }
        for _ in 0..10 {
            reader.pop().unwrap();
        }
        for _ in 0..5 {
            writer.push(10).unwrap();
        }
        // Write pointer has wrapped numerically below the read pointer
        assert_eq!(reader.usage(), 122);
    }

    #[test]
    fn test_roles_are_enforced() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "roles", 1, 2);

        assert_eq!(writer.role(), Role::Writer);
        assert_eq!(reader.role(), Role::Reader);
        assert!(writer.is_writer() && !writer.is_reader());

        assert!(matches!(
            reader.push(10),
            Err(ShmRingError::WriteForbidden { .. })
        ));
        assert!(matches!(
            writer.pop(),
            Err(ShmRingError::ReadForbidden { .. })
        ));
        assert!(matches!(
            writer.pop_many(2),
            Err(ShmRingError::ReadForbidden { .. })
        ));

        // Still enforced once the ring holds data
        writer.push(1).unwrap();
        writer.push(2).unwrap();
        assert!(matches!(
            writer.pop(),
            Err(ShmRingError::ReadForbidden { .. })
        ));
        assert!(matches!(
            reader.push(3),
            Err(ShmRingError::WriteForbidden { .. })
        ));
    }

    #[test]
    fn test_out_of_range_item_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "range", 1, 4);

        assert!(matches!(
            writer.push(256),
            Err(ShmRingError::ValueOutOfRange { .. })
        ));

        // The rejected push must not have advanced the write pointer
        writer.push(7).unwrap();
        assert_eq!(reader.pop().unwrap(), Some(7));
        assert_eq!(reader.pop().unwrap(), None);
    }

    #[test]
    fn test_display_forms() {
        let dir = TempDir::new().unwrap();
        let (mut writer, reader) = pair(&dir, "disp", 1, 2);

        assert_eq!(format!("{}", writer), "RingBuffer (disp)");
        assert_eq!(format!("{}", reader), "RingBuffer (disp) (0.00% full)");

        writer.push(1).unwrap();
        assert_eq!(format!("{}", reader), "RingBuffer (disp) (50.00% full)");
    }

    #[test]
    fn test_stats_snapshot() {
        let dir = TempDir::new().unwrap();
        let (mut writer, reader) = pair(&dir, "stats", 2, 4);

        writer.push(1).unwrap();
        writer.push(2).unwrap();

        let stats = reader.stats();
        assert_eq!(stats.name, "stats");
        assert_eq!(stats.item_size, 2);
        assert_eq!(stats.length, 4);
        assert_eq!(stats.unread, 2);
        assert!((stats.fill_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut reader) = pair(&dir, "cleanup", 1, 2);

        reader.cleanup().unwrap();
        reader.cleanup().unwrap();
        writer.cleanup().unwrap();
        writer.cleanup().unwrap();

        assert!(matches!(
            writer.push(1),
            Err(ShmRingError::Platform { .. })
        ));
    }

    #[test]
    fn test_independent_readers_each_drain_the_stream() {
        let dir = TempDir::new().unwrap();
        let (mut writer, mut first) = pair(&dir, "bcast", 1, 8);
        let mut second = RingBuffer::new(ring_config(&dir, "bcast", 1, 8)).unwrap();

        for i in 1..=5 {
            writer.push(i).unwrap();
        }

        assert_eq!(first.pop_many(5).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(second.pop_many(5).unwrap(), vec![1, 2, 3, 4, 5]);
    }
}
