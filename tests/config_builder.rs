use anyhow::Result;

use pageq::{page_error_kind, PageBuilder, PageConfig, PageError, PageIo};

// Один тест на файл: переменные окружения общие для процесса.
#[test]
fn env_and_builder_overrides() -> Result<()> {
    std::env::set_var("PQ_PAGE_CAPACITY", " 4096 ");
    std::env::set_var("PQ_PAGE_HEADER_DETAILS", "from-env");
    std::env::set_var("PQ_PAGE_VERIFY_READS", "off");

    let cfg = PageConfig::from_env();
    assert_eq!(cfg.capacity, 4096);
    assert_eq!(cfg.header_details, b"from-env");
    assert!(!cfg.verify_on_read);

    // builder стартует с env и позволяет переопределить поля
    let cfg = PageBuilder::new().verify_on_read(true).build();
    assert_eq!(cfg.capacity, 4096);
    assert!(cfg.verify_on_read);

    // мусор в env игнорируется
    std::env::set_var("PQ_PAGE_CAPACITY", "lots");
    std::env::set_var("PQ_PAGE_VERIFY_READS", "yes");
    let cfg = PageConfig::from_env();
    assert_eq!(cfg.capacity, 64 * 1024);
    assert!(cfg.verify_on_read);

    std::env::remove_var("PQ_PAGE_CAPACITY");
    std::env::remove_var("PQ_PAGE_HEADER_DETAILS");
    std::env::remove_var("PQ_PAGE_VERIFY_READS");

    // from_default() не читает env
    let mut page = PageBuilder::from_default()
        .capacity(256)
        .header_details("q")
        .build_page()?;
    page.create()?;
    assert_eq!(page.capacity(), 256);
    assert_eq!(page.write_position(), 7);
    assert_eq!(page.read_header_details()?, b"q");

    let err = PageBuilder::from_default()
        .capacity(5)
        .build_page()
        .unwrap_err();
    assert!(matches!(
        page_error_kind(&err),
        Some(PageError::CapacityExceeded { needed: 6, capacity: 5 })
    ));
    Ok(())
}
