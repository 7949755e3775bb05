mod common;

use panelchop::detection::build_panel_pipeline;
use panelchop::ProcessorConfig;

#[test]
fn staged_pipeline_matches_the_direct_path() {
    let page = common::page_with_rects(1500, 1500, &[(40, 40, 600, 500), (700, 700, 600, 500)]);

    let pipeline = build_panel_pipeline(ProcessorConfig::default(), false);
    let items = pipeline.run(page.clone()).unwrap();

    let direct = panelchop::detect_panels(&page, &ProcessorConfig::default()).unwrap();
    assert_eq!(items.len(), direct.len());

    for item in &items {
        let panel = item.descriptor.as_ref().expect("panel item lost its descriptor");
        assert_eq!(item.image.width(), panel.bounding_box.width);
        assert_eq!(item.image.height(), panel.bounding_box.height);
    }
}

#[test]
fn debug_mode_dumps_every_stage() {
    let page = common::page_with_rect(1500, 1500, 40, 40, 600, 500);
    let dir = tempfile::TempDir::new().unwrap();
    let debug_dir = dir.path().join("stages");

    let pipeline = build_panel_pipeline(ProcessorConfig::default(), false)
        .with_debug(debug_dir.clone())
        .unwrap();
    pipeline.run(page).unwrap();

    // Input plus the six stages of the standard chain.
    let entries: Vec<_> = std::fs::read_dir(&debug_dir).unwrap().collect();
    assert_eq!(entries.len(), 7);
    assert!(debug_dir.join("00_input/01.png").exists());
    assert!(debug_dir.join("05_panel_split/01.png").exists());
}

#[test]
fn debug_mode_refuses_a_non_empty_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("leftover.txt"), "x").unwrap();

    let result = build_panel_pipeline(ProcessorConfig::default(), false)
        .with_debug(dir.path().to_path_buf());
    assert!(result.is_err());
}
