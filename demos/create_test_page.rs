use image::{Rgb, RgbImage};

fn draw_panel(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32) {
    for py in y..y + h {
        for px in x..x + w {
            let on_border = px < x + 4 || px >= x + w - 4 || py < y + 4 || py >= y + h - 4;
            let color = if on_border {
                Rgb([0, 0, 0])
            } else {
                // Flat fill so the panel interior produces no extra contours
                Rgb([200, 220, 240])
            };
            img.put_pixel(px, py, color);
        }
    }
}

fn main() {
    let mut img = RgbImage::from_pixel(1200, 1600, Rgb([255, 255, 255]));

    // A 2x2 page layout with uneven gutters
    draw_panel(&mut img, 40, 40, 540, 700);
    draw_panel(&mut img, 620, 40, 540, 700);
    draw_panel(&mut img, 40, 800, 540, 760);
    draw_panel(&mut img, 620, 800, 540, 760);

    img.save("test_page.png").unwrap();
    println!("Created test_page.png (1200x1600, four panels)");
}
