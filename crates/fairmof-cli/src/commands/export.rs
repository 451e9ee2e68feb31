use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use fairmof::core::io::store::PropertyStore;
use std::io::Write;
use tracing::info;

const HEADER: [&str; 8] = [
    "identifier",
    "void_fraction",
    "n_channels",
    "pore_limiting_diameter_A",
    "largest_cavity_diameter_A",
    "largest_included_sphere_along_free_sphere_path_A",
    "accessible_surface_area_A^2",
    "accessible_volume_A^3",
];

pub fn run(args: ExportArgs) -> Result<()> {
    if !args.store.exists() {
        return Err(CliError::Argument(format!(
            "Property store does not exist: {}",
            args.store.display()
        )));
    }
    let store = PropertyStore::open(&args.store)?;
    let file = std::fs::File::create(&args.output)?;
    write_csv(&store, file)?;
    info!("Exported {} record(s) to {:?}", store.len(), &args.output);
    println!(
        "Exported {} record(s) to {}",
        store.len(),
        args.output.display()
    );
    Ok(())
}

/// Writes one row per identifier, in identifier order.
pub fn write_csv<W: Write>(store: &PropertyStore, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let to_cli = |e: csv::Error| CliError::Other(e.into());

    csv.write_record(HEADER).map_err(to_cli)?;
    for (identifier, record) in store.iter() {
        csv.write_record([
            identifier.clone(),
            record.void_fraction.to_string(),
            record.n_channels.to_string(),
            record.pore_limiting_diameter.to_string(),
            record.largest_cavity_diameter.to_string(),
            record
                .largest_included_sphere_along_free_sphere_path
                .to_string(),
            record.accessible_surface_area.to_string(),
            record.accessible_volume.to_string(),
        ])
        .map_err(to_cli)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use fairmof::core::io::store::merge_properties;
    use fairmof::core::models::records::PropertyRecord;
    use tempfile::tempdir;

    fn record(void_fraction: f64) -> PropertyRecord {
        PropertyRecord {
            void_fraction,
            n_channels: 2,
            pore_limiting_diameter: 3.0,
            largest_cavity_diameter: 4.5,
            largest_included_sphere_along_free_sphere_path: 3.5,
            accessible_surface_area: 100.0,
            accessible_volume: 1000.0,
        }
    }

    #[test]
    fn rows_are_sorted_by_identifier() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mof_properties.json");
        merge_properties(&path, "ZZZ", record(0.1)).unwrap();
        merge_properties(&path, "AAA", record(0.25)).unwrap();

        let mut buffer = Vec::new();
        write_csv(&PropertyStore::open(&path).unwrap(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("identifier,void_fraction,n_channels"));
        assert_eq!(lines[1], "AAA,0.25,2,3,4.5,3.5,100,1000");
        assert!(lines[2].starts_with("ZZZ,0.1,"));
    }

    #[test]
    fn missing_store_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let cli = Cli::parse_from([
            "fairmof",
            "export",
            dir.path().join("absent.json").to_str().unwrap(),
            "-o",
            dir.path().join("out.csv").to_str().unwrap(),
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("Expected 'export' subcommand");
        };
        assert!(matches!(run(args), Err(CliError::Argument(_))));
    }
}
