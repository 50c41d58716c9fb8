// Example usage of the force file reader

use jpk_force::{global_minimum, Channel, ForceFile, StepDetector};
use tracing::{debug, info, Level};
use tracing_subscriber;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/sample.jpk-force".to_string());

    // Open a force file; all headers are parsed here
    let mut force_file = ForceFile::open(&path)?;

    let props = force_file.properties();
    info!("Measured at {}", props.timestamp().unwrap_or("unknown"));
    for (channel, index) in props.channels.iter() {
        info!("  [{}] {}", index, channel);
    }
    info!(
        "vDeflection unit: {}, height unit: {}",
        props.unit(Channel::VDeflection).unwrap_or("?"),
        props.unit(Channel::Height).unwrap_or("?")
    );

    // Convert every segment
    for curves in force_file.load_curves()? {
        info!(
            "Segment {}: {} samples",
            curves.segment,
            curves.force.len()
        );
        if !curves.force.is_empty() {
            debug!(
                "  first: force={} {}, height={} {}",
                curves.force.values[0],
                curves.force.unit,
                curves.height.values[0],
                curves.height.unit
            );
        }
    }

    // Steps in the retract segment
    let retract = force_file.segment_curves("retract")?;
    let min = global_minimum(&retract.height.values, &retract.force.values)?;
    info!("\nRetract minimum: {} N at index {}", min.y, min.index);

    let steps = StepDetector::default()
        .retract_steps(&retract.height.values, &retract.force.values)?;
    info!("Steps after the minimum (relative indices): {:?}", steps);

    Ok(())
}
