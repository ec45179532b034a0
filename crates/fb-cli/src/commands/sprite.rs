use serde_json::json;

use fb_core::identity::{generate_identity, sprite};
use fb_core::types::AgentRole;

pub fn run(
    seed: &str,
    role: &str,
    name: Option<&str>,
    frame: u32,
    ascii: bool,
) -> anyhow::Result<()> {
    let role: AgentRole = role.parse().map_err(anyhow::Error::msg)?;
    let name = name.unwrap_or(seed);

    let identity = generate_identity(seed, role, name);
    let matrix = sprite(&identity, frame);

    if ascii {
        println!("{} ({} {})", identity.callsign, role, identity.palette_key);
        for y in 0..matrix.height {
            let row: String = (0..matrix.width)
                .map(|x| if matrix.get(x, y).is_some() { '#' } else { '.' })
                .collect();
            println!("{}", row);
        }
        return Ok(());
    }

    super::print_json(
        &json!({
            "identity": identity,
            "frame": frame,
            "sprite": matrix,
        }),
        true,
    )
}
