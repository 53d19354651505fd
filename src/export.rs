//! CSV export of the sightings table

use crate::Result;
use crate::trend::DatedSighting;
use std::io::Write;

/// Download name offered to the browser
pub const EXPORT_FILE_NAME: &str = "animal_sightings.csv";

/// Write a `Species,Date` header and one row per dated sighting
pub fn write_sightings_csv<W: Write>(writer: W, rows: &[DatedSighting]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Species", "Date"])?;
    for row in rows {
        let date = row.date.format("%Y-%m-%d").to_string();
        csv_writer.write_record([row.species.as_str(), date.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// The CSV export as a UTF-8 string
pub fn sightings_csv(rows: &[DatedSighting]) -> Result<String> {
    let mut buffer = Vec::new();
    write_sightings_csv(&mut buffer, rows)?;
    // csv only writes the UTF-8 text it was given
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(species: &str, y: i32, m: u32, d: u32) -> DatedSighting {
        DatedSighting {
            species: species.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
    }

    #[test]
    fn test_single_row_export() {
        let csv = sightings_csv(&[dated("Deer", 2024, 5, 1)]).unwrap();
        assert_eq!(csv, "Species,Date\nDeer,2024-05-01\n");
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(sightings_csv(&[]).unwrap(), "Species,Date\n");
    }

    #[test]
    fn test_species_with_comma_is_quoted() {
        let csv = sightings_csv(&[dated("Deer, Spotted", 2024, 5, 1)]).unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"Deer, Spotted\",2024-05-01"));
    }
}
