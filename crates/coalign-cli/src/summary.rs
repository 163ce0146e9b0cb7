use std::path::Path;

use coalign_core::pipeline::{AlignConfig, AlignmentOutput};
use console::Style;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_config_summary(manifest: &Path, frame_count: usize, config: &AlignConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Coalign"));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Manifest"),
        s.path.apply_to(manifest.display())
    );
    println!("  {:<14}{}", s.label.apply_to("Frames"), s.value.apply_to(frame_count));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Wavelength"),
        s.value.apply_to(format!("{:+.2}", config.reference_wavelength))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(format!("{} deg/min", config.rotation_rate_deg_per_min))
    );
    if config.save {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Record"),
            s.value.apply_to(config.record_level())
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Record"),
            s.disabled.apply_to("not saved")
        );
    }
    println!();
}

pub fn print_alignment_summary(output: &AlignmentOutput) {
    let s = Styles::new();
    let record = &output.record;

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Centre"),
        s.value.apply_to(format!("({}, {})", record.xc, record.yc))
    );
    if let (Some(dt), Some(angle)) = (record.dt.last(), record.angle.last()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Span"),
            s.value.apply_to(format!("{dt:.2} min, {:.3} deg", angle.to_degrees()))
        );
    }
    if let (Some(dx), Some(dy)) = (record.dx.last(), record.dy.last()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Final drift"),
            s.value.apply_to(format!("dx {dx:+.3} px, dy {dy:+.3} px"))
        );
    }
    match output.saved {
        Some(ref path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Saved"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Saved"),
            s.disabled.apply_to(format!("no ({})", output.base_name))
        ),
    }
    println!();
}
