mod common;

use image::{DynamicImage, Rgb, Rgba, RgbaImage};
use imageproc::point::Point;
use panelchop::{
    PanelDescriptor, ProcessorConfig, detect_panels, draw_panel_bounds, isolate_panels,
};

#[test]
fn isolation_is_order_preserving_and_bijective() {
    let page = common::page_with_rects(1500, 1500, &[(40, 40, 600, 500), (700, 40, 600, 500)]);
    let panels = detect_panels(&page, &ProcessorConfig::default()).unwrap();
    assert_eq!(panels.len(), 2);

    let frames = isolate_panels(&page, &panels).unwrap();
    assert_eq!(frames.len(), panels.len());

    // frames[i] corresponds to panels[i]: dimensions equal the bounding box.
    for (frame, panel) in frames.iter().zip(&panels) {
        assert_eq!(frame.width(), panel.bounding_box.width);
        assert_eq!(frame.height(), panel.bounding_box.height);
    }
}

#[test]
fn diamond_polygon_masks_crop_corners() {
    // Diamond inscribed in its bounding box on a solid red page: the crop's
    // corners fall outside the polygon and must stay blank, the center must
    // carry source pixels.
    let page = common::solid_page(100, 100, Rgb([255, 0, 0]));
    let diamond = PanelDescriptor::from_polygon(vec![
        Point::new(50, 10),
        Point::new(90, 50),
        Point::new(50, 90),
        Point::new(10, 50),
    ])
    .unwrap();

    let frames = isolate_panels(&page, std::slice::from_ref(&diamond)).unwrap();
    let frame = frames[0].to_rgba8();
    let (w, h) = frame.dimensions();
    assert_eq!((w, h), (81, 81));

    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_eq!(frame.get_pixel(x, y)[3], 0, "corner ({x},{y}) not blank");
    }
    let center = frame.get_pixel(w / 2, h / 2);
    assert_eq!(center[3], 255);
    assert_eq!(center[0], 255);
}

#[test]
fn mask_erosion_trims_the_polygon_edge() {
    let page = common::solid_page(100, 100, Rgb([0, 128, 0]));
    let diamond = PanelDescriptor::from_polygon(vec![
        Point::new(50, 10),
        Point::new(90, 50),
        Point::new(50, 90),
        Point::new(10, 50),
    ])
    .unwrap();

    let frames = isolate_panels(&page, std::slice::from_ref(&diamond)).unwrap();
    let frame = frames[0].to_rgba8();

    // The top vertex of the diamond is filled by the polygon rasterization
    // but sits next to background, so the erosion pass trims it away.
    assert_eq!(frame.get_pixel(40, 0)[3], 0);
    assert_eq!(frame.get_pixel(40, 40)[3], 255);
}

#[test]
fn isolate_empty_image_fails() {
    let img = DynamicImage::new_rgb8(0, 0);
    assert!(isolate_panels(&img, &[]).is_err());
}

#[test]
fn isolate_with_no_panels_yields_no_frames() {
    let page = common::blank_page(100, 100);
    let frames = isolate_panels(&page, &[]).unwrap();
    assert!(frames.is_empty());
}

#[test]
fn draw_bounds_strokes_the_box() {
    let page = common::page_with_rect(1500, 1500, 10, 10, 200, 200);
    let panels = detect_panels(&page, &ProcessorConfig::default()).unwrap();
    assert_eq!(panels.len(), 1);

    let mut preview = page.to_rgba8();
    draw_panel_bounds(&mut preview, &panels, Rgba([255, 255, 0, 255]), 2).unwrap();

    let bb = &panels[0].bounding_box;
    assert_eq!(*preview.get_pixel(bb.x, bb.y), Rgba([255, 255, 0, 255]));
    // Thickness 2: the row just inside the outline is stroked too.
    assert_eq!(*preview.get_pixel(bb.x + 1, bb.y + 1), Rgba([255, 255, 0, 255]));
    // Well outside the box the page is untouched.
    assert_eq!(*preview.get_pixel(1400, 1400), Rgba([255, 255, 255, 255]));
}

#[test]
fn draw_bounds_empty_image_fails() {
    let mut img = RgbaImage::new(0, 0);
    assert!(draw_panel_bounds(&mut img, &[], Rgba([255, 255, 0, 255]), 1).is_err());
}
