use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use trail_common::{OutputConfig, Snapshot};

/// Writes the snapshot as a single JSON document.
pub fn write_snapshot_json(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, snapshot).context("Error serializing snapshot to JSON")?;
    writer.flush()?;
    Ok(())
}

/// One CSV row per lattice row, one column per lattice column.
pub fn write_pheromone_csv(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    if snapshot.world_size > 0 {
        for row in snapshot.pheromone.chunks(snapshot.world_size) {
            writer.write_record(row.iter().map(|level| level.to_string()))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_agents_csv(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    writer.write_record(["row", "col", "status"])?;
    for agent in &snapshot.agents {
        writer.write_record([
            agent.row.to_string(),
            agent.col.to_string(),
            agent.status.as_str().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes every artifact enabled in `output` next to `dir`, returning the paths written.
pub fn save_final_state(
    snapshot: &Snapshot,
    output: &OutputConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let base = &output.base_filename;

    if output.save_snapshot {
        let path = dir.join(format!("{}_snapshot.json", base));
        write_snapshot_json(snapshot, &path)?;
        info!("Final snapshot saved to {}", path.display());
        written.push(path);
    } else {
        info!("Skipping snapshot JSON as per config.");
    }

    if output.save_pheromone_csv {
        let path = dir.join(format!("{}_pheromone.csv", base));
        write_pheromone_csv(snapshot, &path)?;
        info!("Pheromone grid saved to {}", path.display());
        written.push(path);
    }

    if output.save_agents_csv {
        let path = dir.join(format!("{}_agents.csv", base));
        write_agents_csv(snapshot, &path)?;
        info!("Agent positions saved to {}", path.display());
        written.push(path);
    }

    Ok(written)
}
