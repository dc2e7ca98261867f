use image::{Rgb, RgbImage};

fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::new(800, 600);

    // Gradient background with a bright rectangle so both detectors find edges
    for y in 0..600 {
        for x in 0..800 {
            let pixel = if (250..550).contains(&x) && (200..400).contains(&y) {
                Rgb([235, 235, 225])
            } else {
                Rgb([(x * 255 / 800) as u8, (y * 255 / 600) as u8, 64])
            };
            img.put_pixel(x, y, pixel);
        }
    }

    img.save("test_image.png")?;
    println!("Created test_image.png (800x600 RGB)");
    Ok(())
}
