//! Example: Bouncing circle drawn frame by frame

use lunar_canvas::{
    Canvas, CanvasSettings, Color, EndPath, ExportedImage, GetImage, Segment, Styles,
};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut canvas = Canvas::new(CanvasSettings {
        width: 200,
        height: 120,
        ..CanvasSettings::default()
    });
    canvas.create().expect("surface creates once");
    canvas
        .set_styles(&Styles::fill_color(Color::rgb(220, 60, 40)))
        .expect("styles apply");

    let (mut x, mut y) = (100.0, 60.0);
    let (mut dx, mut dy) = (2.0, 4.0);
    let radius = 10.0;

    for frame in 0..120 {
        canvas
            .clear(false, None)
            .expect("clear")
            .start_path(None)
            .expect("path opens")
            .define_segments(&[Segment::Arc {
                x,
                y,
                radius,
                start_angle: 0.0,
                end_angle: std::f64::consts::TAU,
                counterclockwise: false,
            }])
            .expect("segments apply")
            .end_path(&EndPath::fill())
            .expect("path ends");

        if x + dx + radius > 200.0 || x + dx - radius < 0.0 {
            dx = -dx;
        }
        if y + dy + radius > 120.0 || y + dy - radius < 0.0 {
            dy = -dy;
        }
        x += dx;
        y += dy;

        if frame % 30 == 0 {
            println!("frame {frame}: circle at ({x:.0}, {y:.0})");
        }
    }

    if let Ok(ExportedImage::DataUrl(url)) = canvas.get_image(GetImage::DataUrl(None)) {
        println!("final frame exported, {} chars of data url", url.len());
    }
}
