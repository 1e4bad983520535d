use anyhow::Result;

use pageq::{metrics, MemoryPage, PageIo};

// Один тест на файл: счётчики глобальные для процесса.
#[test]
fn counters_follow_page_activity() -> Result<()> {
    metrics::reset();

    let mut page = MemoryPage::new(256);
    page.create()?;
    page.write(b"ab", 1)?;
    page.write(b"cde", 2)?;
    page.read(1, 2)?;

    let mut again = MemoryPage::from_bytes(256, page.buffer().to_vec())?;
    again.open(1, 2)?;

    let mut bad = MemoryPage::from_bytes(256, page.buffer().to_vec())?;
    assert!(bad.open(2, 2).is_err());

    let mut corrupt = page.into_bytes();
    corrupt[6 + 12] ^= 0xFF;
    let mut broken = MemoryPage::from_bytes(256, corrupt)?;
    assert!(broken.open(1, 2).is_err());

    let m = metrics::snapshot();
    assert_eq!(m.pages_created, 1);
    assert_eq!(m.pages_opened, 1);
    assert_eq!(m.page_open_failures, 2);
    assert_eq!(m.records_written, 2);
    assert_eq!(m.record_bytes_written, 18 + 19);
    assert_eq!(m.records_read, 2);
    assert_eq!(m.records_replayed, 2);
    assert_eq!(m.checksum_failures, 1);
    assert!((m.avg_record_bytes() - 18.5).abs() < f64::EPSILON);

    let json = m.to_json()?;
    assert!(json.contains("\"records_written\":2"));

    metrics::reset();
    assert_eq!(metrics::snapshot().records_written, 0);
    Ok(())
}
