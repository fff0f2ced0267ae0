use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use blockfall_engine::{GameConfig, ShapeDefinition};

/// Writes `value` as pretty-printed JSON to `output_path`, or to stdout if unset.
pub fn write_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json_to(BufWriter::new(file), value, &path.display().to_string())
        }
        None => write_json_to(io::stdout().lock(), value, "stdout"),
    }
}

fn write_json_to<W, T>(mut writer: W, value: &T, destination: &str) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {destination}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {destination}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a game config file. Fields missing from the file keep their defaults.
pub fn read_config_file<P>(path: P) -> anyhow::Result<GameConfig>
where
    P: AsRef<Path>,
{
    read_json_file("config", path)
}

/// Reads a shape file: a JSON array of `{ "name", "rows" }` objects.
pub fn read_shapes_file<P>(path: P) -> anyhow::Result<Vec<ShapeDefinition>>
where
    P: AsRef<Path>,
{
    read_json_file("shapes", path)
}
