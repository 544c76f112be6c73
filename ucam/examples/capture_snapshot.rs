//! Capture one JPEG snapshot over a serial port

use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use ucam::{
    BaudRate, Camera, DeviceConfig, ImageFormat, JpegResolution, LinkConfig, SerialTransport,
    SnapshotKind,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG=ucam=trace shows every frame)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let port = std::env::var("UCAM_PORT").unwrap_or_else(|_| SerialTransport::DEFAULT_PATH.to_string());
    let output = std::env::var("UCAM_OUTPUT").unwrap_or_else(|_| "snapshot.jpg".to_string());

    // The camera autodetects the speed during SYNC
    let transport = SerialTransport::open(&port, 115_200)
        .with_context(|| format!("opening {}", port))?;
    // Firmware packages end with a verify code
    let camera = Camera::with_config(transport, LinkConfig::default().with_verify_code(true));

    #[cfg(feature = "rpi")]
    let camera = camera.with_reset_line(ucam::GpioResetLine::new(ucam::GpioResetLine::DEFAULT_PIN)?);

    let mut camera = camera;

    let config = DeviceConfig::new(ImageFormat::Jpeg, JpegResolution::R640x480.into())
        .with_baud_rate(BaudRate::B921600);
    camera.try_init(&config).context("initializing camera")?;
    println!("✓ Camera ready ({} byte packages)", camera.package_size());

    let file = File::create(&output).with_context(|| format!("creating {}", output))?;
    let mut sink = BufWriter::new(file);

    let summary = camera
        .capture(SnapshotKind::Compressed, &mut sink)
        .context("capturing snapshot")?;
    println!(
        "✓ Wrote {} bytes in {} packages to {}",
        summary.bytes, summary.packages, output
    );

    Ok(())
}
