mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

mod tests {
    use std::error::Error;
    use std::str::FromStr;

    use xorp_mrt::addr::Prefix;
    use xorp_mrt::mrib::{MribTable, PendingOp};
    use xorp_mrt::{IPv4, Mrib, PrefixId};

    fn mrib(s: &str) -> Result<Mrib<IPv4>, Box<dyn Error>> {
        Ok(Mrib::new(PrefixId::try_from(Prefix::from_str(s)?)?))
    }

    fn pfx(s: &str) -> Result<PrefixId<IPv4>, Box<dyn Error>> {
        Ok(PrefixId::try_from(Prefix::from_str(s)?)?)
    }

    #[test]
    fn test_commit_is_per_transaction() -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let mut table = MribTable::<IPv4>::new();
        table.add_pending_insert(1, mrib("10.0.0.0/8")?);
        table.add_pending_insert(1, mrib("10.1.0.0/16")?);
        table.add_pending_insert(2, mrib("172.16.0.0/12")?);

        // Nothing is visible before the commit.
        assert!(table.is_empty());
        assert!(table.find_exact(&pfx("10.0.0.0/8")?).is_none());
        assert_eq!(table.pending_transactions_count(), 3);

        table.commit_pending_transactions(1);
        assert!(table.find_exact(&pfx("10.0.0.0/8")?).is_some());
        assert!(table.find_exact(&pfx("10.1.0.0/16")?).is_some());
        assert!(table.find_exact(&pfx("172.16.0.0/12")?).is_none());
        assert_eq!(table.size(), 2);
        assert!(!table.is_pending(1));
        assert!(table.is_pending(2));

        table.abort_pending_transactions(2);
        assert!(!table.is_pending(2));
        table.commit_pending_transactions(2);
        assert!(table.find_exact(&pfx("172.16.0.0/12")?).is_none());
        assert_eq!(table.size(), 2);
        assert_eq!(table.pending_transactions_count(), 0);

        Ok(())
    }

    #[test]
    fn test_commit_replays_in_order() -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let mut table = MribTable::<IPv4>::new();
        table.insert(mrib("192.0.2.0/24")?);
        table.insert(mrib("198.51.100.0/24")?);

        table.add_pending_remove_all(3);
        table.add_pending_insert(3, mrib("203.0.113.0/24")?);
        table.add_pending_remove(3, mrib("198.51.100.0/24")?);
        table.add_pending_insert(3, mrib("198.51.100.0/24")?);

        let ops: Vec<_> = table
            .pending_transactions()
            .map(|t| matches!(t.op(), PendingOp::RemoveAll))
            .collect();
        assert_eq!(ops, vec![true, false, false, false]);

        table.commit_pending_transactions(3);
        let walk: Vec<_> = table.iter().map(|m| m.dest_prefix()).collect();
        assert_eq!(walk, vec![pfx("198.51.100.0/24")?, pfx("203.0.113.0/24")?]);

        Ok(())
    }

    #[test]
    fn test_remove_all_keeps_pending() -> Result<(), Box<dyn Error>> {
        crate::common::init();

        let mut table = MribTable::<IPv4>::new();
        table.insert(mrib("192.0.2.0/24")?);
        table.add_pending_insert(4, mrib("203.0.113.0/24")?);

        table.remove_all_entries();
        assert!(table.is_empty());
        assert!(table.is_pending(4));

        table.commit_pending_transactions(4);
        assert_eq!(table.size(), 1);

        table.add_pending_insert(5, mrib("10.0.0.0/8")?);
        table.add_pending_insert(6, mrib("11.0.0.0/8")?);
        table.abort_all_pending_transactions();
        assert_eq!(table.pending_transactions_count(), 0);

        table.add_pending_insert(7, mrib("10.0.0.0/8")?);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.pending_transactions_count(), 0);

        Ok(())
    }
}
