//! Utilities for interfacing with jointsim: configuration files, topology files and result sinks.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use jointsim_core::network::types::{FundedLink, User};
use jointsim_core::network::Network;
use jointsim_core::report::Reporter;
use jointsim_core::{Spec, SuccessSample};

/// Reads a [`Spec`] from a JSON file. Missing fields take their default values.
pub fn read_spec(path: impl AsRef<Path>) -> Result<Spec, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let spec: Spec = match extension(path) {
        Some("json") => serde_json::from_str(&contents)?,
        _ => return Err(Error::UnknownFileType(path.into())),
    };
    Ok(spec)
}

/// Reads a [`Network`] from a file containing a [`TopologySpec`] in JSON format.
pub fn read_network(topology_spec: impl AsRef<Path>) -> Result<Network, Error> {
    let spec = read_topology_spec(topology_spec)?;
    Ok(Network::new(&spec.users, &spec.relationships)?)
}

/// Reads a [`TopologySpec`] from a file in JSON format.
pub fn read_topology_spec(path: impl AsRef<Path>) -> Result<TopologySpec, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let spec: TopologySpec = match extension(path) {
        Some("json") => serde_json::from_str(&contents)?,
        _ => return Err(Error::UnknownFileType(path.into())),
    };
    Ok(spec)
}

/// Writes a [`TopologySpec`] to a file in JSON format.
pub fn write_topology_spec(path: impl AsRef<Path>, spec: &TopologySpec) -> Result<(), Error> {
    let path = path.as_ref();
    match extension(path) {
        Some("json") => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, spec)?;
            writer.flush()?;
        }
        _ => return Err(Error::UnknownFileType(path.into())),
    }
    Ok(())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// A topology specification.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TopologySpec {
    /// Users.
    pub users: Vec<User>,
    /// Funded relationships, in provisioning order.
    pub relationships: Vec<FundedLink>,
}

impl From<&Network> for TopologySpec {
    fn from(network: &Network) -> Self {
        Self {
            users: network.users().cloned().collect(),
            relationships: network.relationships().copied().collect(),
        }
    }
}

/// Writes the success-ratio series as a JSON array of `{ "trials", "ratio" }` objects.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    /// Creates a reporter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for JsonReporter {
    type Error = Error;

    fn report(&mut self, samples: &[SuccessSample]) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, samples)?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes the success-ratio series as two whitespace-separated columns, trials and ratio, under
/// a `#` header line.
#[derive(Debug, Clone)]
pub struct PlotDataReporter {
    path: PathBuf,
}

impl PlotDataReporter {
    /// Creates a reporter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for PlotDataReporter {
    type Error = Error;

    fn report(&mut self, samples: &[SuccessSample]) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        writeln!(writer, "# trials ratio")?;
        for sample in samples {
            writeln!(writer, "{} {}", sample.trials, sample.ratio)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Error kinds for specifications and I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Error constructing a valid topology.
    #[error("invalid topology")]
    Topology(#[from] jointsim_core::network::TopologyError),
}

#[cfg(test)]
mod tests {
    use jointsim_core::network::UserId;
    use jointsim_core::testing;
    use jointsim_core::units::Coins;

    use super::*;

    fn samples() -> Vec<SuccessSample> {
        vec![
            SuccessSample {
                trials: 100,
                ratio: 0.25,
            },
            SuccessSample {
                trials: 200,
                ratio: 0.5,
            },
        ]
    }

    #[test]
    fn partial_spec_takes_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("spec.json");
        std::fs::write(&path, r#"{ "nr_users": 12, "seed": 9 }"#)?;
        let spec = read_spec(&path)?;
        assert_eq!(spec, Spec::builder().nr_users(12).seed(9).build());
        Ok(())
    }

    #[test]
    fn unknown_extension_fails() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("spec.toml");
        std::fs::write(&path, "nr_users = 12")?;
        assert!(matches!(read_spec(&path), Err(Error::UnknownFileType(..))));
        Ok(())
    }

    #[test]
    fn topology_file_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("topology.json");
        let network = testing::four_user_network();
        let spec = TopologySpec::from(&network);
        write_topology_spec(&path, &spec)?;
        assert_eq!(read_topology_spec(&path)?, spec);
        let loaded = read_network(&path)?;
        assert_eq!(loaded.nr_users(), 4);
        assert_eq!(
            loaded.capacity_between(UserId::new(1), UserId::new(2)),
            Some(Coins::new(10.0))
        );
        Ok(())
    }

    #[test]
    fn invalid_topology_file_fails() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("topology.json");
        let spec = TopologySpec {
            users: User::population(2),
            relationships: vec![FundedLink::new(UserId::new(0), UserId::new(7), Coins::ONE)],
        };
        write_topology_spec(&path, &spec)?;
        assert!(matches!(read_network(&path), Err(Error::Topology(..))));
        Ok(())
    }

    #[test]
    fn json_reporter_writes_series() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("series.json");
        JsonReporter::new(&path).report(&samples())?;
        let contents = std::fs::read_to_string(&path)?;
        let read: Vec<SuccessSample> = serde_json::from_str(&contents)?;
        assert_eq!(read, samples());
        Ok(())
    }

    #[test]
    fn plot_data_reporter_writes_columns() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("series.dat");
        PlotDataReporter::new(&path).report(&samples())?;
        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents, "# trials ratio\n100 0.25\n200 0.5\n");
        Ok(())
    }
}
