use console::Style;
use dehaze_core::pipeline::config::PipelineConfig;
use dehaze_core::pipeline::{artifact_path, ArtifactKind, DehazeOutput};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &PipelineConfig) {
    let s = Styles::new();
    let d = &config.dehaze;

    println!();
    println!("  {}", s.title.apply_to("Dehaze"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(6)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Dark Channel Prior"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!("{} px", d.window))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Percentile"),
        s.value.apply_to(format!("{}%", d.percentile * 100.0))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Omega"),
        s.value.apply_to(d.omega)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Tmin"),
        s.value.apply_to(d.tmin)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Amax"),
        s.value.apply_to(d.amax)
    );
    println!();

    if d.guided {
        println!("  {}", s.header.apply_to("Guided Filter"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Guide"),
            s.method.apply_to(d.guide)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Radius"),
            s.value.apply_to(format!("{} px", d.radius))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Eps"),
            s.value.apply_to(d.eps)
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Guided Filter"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_run_result(config: &PipelineConfig, output: &DehazeOutput) {
    let s = Styles::new();
    let stem = config
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dehazed");

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Airlight"),
        s.value.apply_to(output.airlight)
    );
    for kind in ArtifactKind::ALL {
        println!(
            "  {:<22}{}",
            s.label.apply_to(kind.to_string()),
            s.path
                .apply_to(artifact_path(&config.output_dir, stem, kind).display())
        );
    }
    println!();
}
