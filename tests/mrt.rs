use std::error::Error;
use std::rc::Rc;
use std::str::FromStr;

use xorp_mrt::addr::Prefix;
use xorp_mrt::mrt::{Mre, Mrt};
use xorp_mrt::{AddressFamily, IPv4, IPv6, PrefixId};

mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

type TestMre<AF> = Rc<Mre<AF, &'static str>>;

fn addr<AF: AddressFamily>(s: &str) -> Result<AF, Box<dyn Error>> {
    Ok(AF::try_from_ipaddr(s.parse()?)?)
}

fn pfx<AF: AddressFamily>(
    a: &str,
    len: u8,
) -> Result<PrefixId<AF>, Box<dyn Error>> {
    Ok(PrefixId::from_addr_masked(addr(a)?, len))
}

fn names<'a, AF: AddressFamily + 'a>(
    iter: impl Iterator<Item = &'a TestMre<AF>>,
) -> Vec<&'static str> {
    iter.map(|mre| *mre.payload()).collect()
}

// Four entries, with sources and groups picked so that the source-first and
// group-first orders differ. `addrs` holds (source, group) for the entries
// "1", "2", "4" and "5", in that order.
fn scenario<AF: AddressFamily>(
    addrs: [(&str, &str); 4],
) -> Result<(Mrt<AF, &'static str>, Vec<TestMre<AF>>), Box<dyn Error>> {
    let mut mrt = Mrt::new();
    let mut entries = vec![];
    for ((s, g), name) in addrs.iter().zip(["1", "2", "4", "5"]) {
        let mre = Rc::new(Mre::new(addr(s)?, addr(g)?, name));
        assert!(mrt.insert(Rc::clone(&mre)).is_some());
        entries.push(mre);
    }
    Ok((mrt, entries))
}

fn check_scenario<AF: AddressFamily>(
    addrs: [(&str, &str); 4],
    missing: (&str, &str),
) -> Result<(), Box<dyn Error>> {
    let (mut mrt, entries) = scenario::<AF>(addrs)?;
    let (s1, g1) = addrs[0];
    let (s4, g4) = addrs[2];

    // A second entry for (s1, g1) is refused.
    let dup = Rc::new(Mre::new(addr(s1)?, addr(g1)?, "11"));
    assert!(mrt.insert(Rc::clone(&dup)).is_none());
    assert!(!dup.is_indexed());
    assert_eq!(mrt.size(), 4);

    let found = mrt.find(addr(s1)?, addr(g1)?);
    assert!(found.is_some_and(|f| Rc::ptr_eq(f, &entries[0])));
    assert!(mrt.find(addr(missing.0)?, addr(missing.1)?).is_none());

    assert_eq!(names(mrt.sg_iter()), vec!["1", "2", "4", "5"]);
    assert_eq!(names(mrt.gs_iter()), vec!["2", "1", "4", "5"]);

    // Source and group prefixes.
    let s_prefix = pfx(s1, 15)?;
    assert_eq!(names(mrt.source_by_prefix(&s_prefix)), vec!["1", "2"]);
    assert_eq!(
        names(mrt.source_by_prefix_begin(&s_prefix)),
        vec!["1", "2", "4", "5"]
    );
    assert_eq!(names(mrt.source_by_prefix_end(&s_prefix)), vec!["4", "5"]);

    let s_all = pfx(s1, 0)?;
    assert_eq!(names(mrt.source_by_prefix(&s_all)), vec!["1", "2", "4", "5"]);
    assert_eq!(mrt.source_by_prefix_end(&s_all).count(), 0);

    let g_prefix = pfx(g4, 16)?;
    assert_eq!(names(mrt.group_by_prefix(&g_prefix)), vec!["4", "5"]);
    assert_eq!(
        names(mrt.group_by_prefix_begin(&g_prefix)),
        vec!["4", "5"]
    );

    let g_all = pfx(g1, 0)?;
    assert_eq!(names(mrt.group_by_prefix(&g_all)), vec!["2", "1", "4", "5"]);
    assert_eq!(mrt.group_by_prefix_end(&g_all).count(), 0);

    // Exact addresses. Entries "4" and "5" share their source.
    assert_eq!(names(mrt.source_by_addr(addr(s4)?)), vec!["4", "5"]);
    assert_eq!(names(mrt.source_by_addr(addr(s1)?)), vec!["1"]);
    assert_eq!(names(mrt.source_by_addr_end(addr(s1)?)), vec!["2", "4", "5"]);
    assert_eq!(names(mrt.group_by_addr(addr(g4)?)), vec!["4"]);
    assert_eq!(names(mrt.group_by_addr_begin(addr(g1)?)), vec!["1", "4", "5"]);
    assert_eq!(names(mrt.group_by_addr_end(addr(g1)?)), vec!["4", "5"]);

    assert_eq!(
        names(mrt.source_group_by_addr_begin(addr(s4)?, addr(g4)?)),
        vec!["4", "5"]
    );
    assert_eq!(
        names(mrt.group_source_by_addr_begin(addr(s1)?, addr(g1)?)),
        vec!["1", "4", "5"]
    );

    // First-of lookups.
    let first = mrt.find_source(addr(s4)?);
    assert!(first.is_some_and(|f| Rc::ptr_eq(f, &entries[2])));
    let first = mrt.find_group(addr(g1)?);
    assert!(first.is_some_and(|f| Rc::ptr_eq(f, &entries[0])));
    assert!(mrt.find_source(addr(missing.0)?).is_none());

    let first = mrt.find_source_by_prefix(&s_prefix);
    assert!(first.is_some_and(|f| Rc::ptr_eq(f, &entries[0])));
    let first = mrt.find_group_by_prefix(&g_prefix);
    assert!(first.is_some_and(|f| Rc::ptr_eq(f, &entries[2])));
    assert!(entries[2].is_same_prefix_g(&g_prefix));

    // The first entry at or after the prefix lies outside of it.
    let s_missing = pfx::<AF>(missing.0, AF::BITS)?;
    assert!(mrt.find_source_by_prefix(&s_missing).is_none());
    let g_missing = pfx::<AF>(missing.1, AF::BITS)?;
    assert!(mrt.find_group_by_prefix(&g_missing).is_none());
    assert!(!entries[0].is_same_prefix_g(&g_prefix));

    // Removing one entry updates both orders.
    assert!(mrt.remove(&entries[1]));
    assert!(!entries[1].is_indexed());
    assert!(!mrt.remove(&entries[1]));
    assert_eq!(mrt.size(), 3);
    assert_eq!(names(mrt.sg_iter()), vec!["1", "4", "5"]);
    assert_eq!(names(mrt.gs_iter()), vec!["1", "4", "5"]);

    mrt.clear();
    assert!(mrt.is_empty());
    assert!(entries.iter().all(|e| !e.is_indexed()));

    Ok(())
}

#[test]
fn test_mrt_ipv4() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    check_scenario::<IPv4>(
        [
            ("123.45.0.1", "224.1.0.2"),
            ("123.45.0.2", "224.1.0.1"),
            ("123.46.0.1", "224.2.0.1"),
            ("123.46.0.1", "224.2.0.2"),
        ],
        ("123.45.0.255", "224.1.0.255"),
    )
}

#[test]
fn test_mrt_ipv6() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    check_scenario::<IPv6>(
        [
            ("2001::1", "ff01::2"),
            ("2001::2", "ff01::1"),
            ("2002::1", "ff02::1"),
            ("2002::1", "ff02::2"),
        ],
        ("2001::ff", "ff01::ff"),
    )
}

#[test]
fn test_range_ends_at_top_of_address_space() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let mut mrt = Mrt::<IPv4, &'static str>::new();
    for (s, g, name) in [
        ("0.0.0.0", "239.255.255.255", "low"),
        ("255.255.255.254", "224.0.0.1", "high"),
        ("255.255.255.255", "224.0.0.1", "max-a"),
        ("255.255.255.255", "232.0.0.1", "max-b"),
    ] {
        mrt.insert(Rc::new(Mre::new(addr(s)?, addr(g)?, name)));
    }

    // The last /8 has no successor: the range runs to the end of the index
    // and does not wrap around to 0.0.0.0.
    let top = PrefixId::try_from(Prefix::from_str("255.0.0.0/8")?)?;
    assert_eq!(
        names(mrt.source_by_prefix(&top)),
        vec!["high", "max-a", "max-b"]
    );
    assert_eq!(mrt.source_by_prefix_end(&top).count(), 0);

    let max = addr::<IPv4>("255.255.255.255")?;
    assert_eq!(names(mrt.source_by_addr(max)), vec!["max-a", "max-b"]);
    assert_eq!(mrt.source_by_addr_end(max).count(), 0);

    let host = PrefixId::host(max);
    assert_eq!(names(mrt.source_by_prefix(&host)), vec!["max-a", "max-b"]);

    // The prefix 0.0.0.0/1 ends right before 128.0.0.0.
    let low = PrefixId::try_from(Prefix::from_str("0.0.0.0/1")?)?;
    assert_eq!(names(mrt.source_by_prefix(&low)), vec!["low"]);
    assert_eq!(
        names(mrt.source_by_prefix_end(&low)),
        vec!["high", "max-a", "max-b"]
    );

    // Nothing at or after 10.0.0.0 has a source inside 10.0.0.0/8.
    let ten = PrefixId::try_from(Prefix::from_str("10.0.0.0/8")?)?;
    assert!(mrt.find_source_by_prefix(&ten).is_none());
    assert_eq!(mrt.source_by_prefix(&ten).count(), 0);

    // Ranges can be walked backwards as well.
    assert_eq!(
        names(mrt.gs_iter().rev()),
        vec!["low", "max-b", "max-a", "high"]
    );

    Ok(())
}

#[test]
fn test_group_range_at_top_of_address_space() -> Result<(), Box<dyn Error>>
{
    crate::common::init();

    let mut mrt = Mrt::<IPv4, &'static str>::new();
    for (s, g, name) in [
        ("10.0.0.1", "0.0.0.0", "zero"),
        ("10.0.0.2", "255.255.255.254", "below"),
        ("10.0.0.1", "255.255.255.255", "max-a"),
        ("10.0.0.2", "255.255.255.255", "max-b"),
    ] {
        mrt.insert(Rc::new(Mre::new(addr(s)?, addr(g)?, name)));
    }

    let max = addr::<IPv4>("255.255.255.255")?;
    assert_eq!(names(mrt.group_by_addr(max)), vec!["max-a", "max-b"]);
    assert_eq!(names(mrt.group_by_addr_begin(max)), vec!["max-a", "max-b"]);
    assert_eq!(mrt.group_by_addr_end(max).count(), 0);

    let below = addr::<IPv4>("255.255.255.254")?;
    assert_eq!(names(mrt.group_by_addr(below)), vec!["below"]);
    assert_eq!(names(mrt.group_by_addr_end(below)), vec!["max-a", "max-b"]);

    let top = PrefixId::try_from(Prefix::from_str("255.0.0.0/8")?)?;
    assert_eq!(
        names(mrt.group_by_prefix(&top)),
        vec!["below", "max-a", "max-b"]
    );
    assert_eq!(mrt.group_by_prefix_end(&top).count(), 0);

    let ten = PrefixId::try_from(Prefix::from_str("10.0.0.0/8")?)?;
    assert!(mrt.find_group_by_prefix(&ten).is_none());

    Ok(())
}

#[test]
fn test_payload_and_display() -> Result<(), Box<dyn Error>> {
    crate::common::init();

    let mre = Mre::<IPv4, _>::new(
        addr("192.0.2.1")?,
        addr("232.1.1.1")?,
        std::cell::Cell::new(0_u32),
    );
    assert_eq!(mre.to_string(), "(192.0.2.1, 232.1.1.1)");

    let mut mrt = Mrt::new();
    let mre = Rc::new(mre);
    mrt.insert(Rc::clone(&mre));

    if let Some(stored) = mrt.find(mre.source_addr(), mre.group_addr()) {
        stored.payload().set(42);
    }
    assert_eq!(mre.payload().get(), 42);

    Ok(())
}
