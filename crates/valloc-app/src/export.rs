//! Report export to CSV and Excel

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use valloc_domain::service::{AllocationReport, ReportEntry, ReportFilter};
use valloc_types::{Error, Result};

const HEADERS: [&str; 13] = [
    "Allocation ID",
    "Date",
    "Employee ID",
    "Employee",
    "Department",
    "Vehicle ID",
    "Make",
    "Model",
    "Year",
    "License Plate",
    "Driver ID",
    "Driver",
    "License Number",
];

/// One row of text cells per report entry; missing entities leave blanks
fn entry_cells(entry: &ReportEntry) -> Vec<String> {
    let mut cells = vec![entry.allocation_id.clone(), entry.date.to_string()];

    match &entry.employee {
        Some(e) => cells.extend([e.id.clone(), e.name.clone(), e.department.clone()]),
        None => cells.extend([String::new(), String::new(), String::new()]),
    }
    match &entry.vehicle {
        Some(v) => cells.extend([
            v.id.clone(),
            v.make.clone(),
            v.model.clone(),
            v.year.to_string(),
            v.license_plate.clone(),
        ]),
        None => cells.extend(std::iter::repeat(String::new()).take(5)),
    }
    match &entry.driver {
        Some(d) => cells.extend([d.id.clone(), d.name.clone(), d.license_number.clone()]),
        None => cells.extend([String::new(), String::new(), String::new()]),
    }

    cells
}

/// Export report rows to a CSV file
pub fn export_to_csv(report: &AllocationReport, output_path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(output_path).map_err(|e| Error::Export(e.to_string()))?;

    writer
        .write_record(HEADERS)
        .map_err(|e| Error::Export(e.to_string()))?;
    for entry in &report.allocations {
        writer
            .write_record(entry_cells(entry))
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export a report to an Excel workbook with a summary and a details sheet
pub fn export_to_excel(
    report: &AllocationReport,
    filter: &ReportFilter,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, report, filter)?;

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, report)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    report: &AllocationReport,
    filter: &ReportFilter,
) -> Result<()> {
    sheet
        .set_name("Summary")
        .map_err(|e| Error::Export(e.to_string()))?;

    let header_format = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, "Vehicle Allocation Report", &header_format)
        .map_err(|e| Error::Export(e.to_string()))?;

    let open = |d: Option<chrono::NaiveDate>| d.map_or("(open)".to_string(), |d| d.to_string());
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "(any)".to_string());
    let rows = [
        ("Start date:", open(filter.start_date)),
        ("End date:", open(filter.end_date)),
        ("Employee:", text(&filter.employee_id)),
        ("Vehicle:", text(&filter.vehicle_id)),
        ("Driver:", text(&filter.driver_id)),
        ("Department:", text(&filter.department)),
    ];

    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Export(e.to_string()))?;
        sheet
            .write_string(row, 1, value)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    let total_row = (rows.len() + 3) as u32;
    sheet
        .write_string_with_format(total_row, 0, "Total records:", &header_format)
        .map_err(|e| Error::Export(e.to_string()))?;
    sheet
        .write_number(total_row, 1, report.total_records as f64)
        .map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, report: &AllocationReport) -> Result<()> {
    sheet
        .set_name("Allocations")
        .map_err(|e| Error::Export(e.to_string()))?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    for (row_idx, entry) in report.allocations.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, cell) in entry_cells(entry).iter().enumerate() {
            sheet
                .write_string(row, col as u16, cell)
                .map_err(|e| Error::Export(e.to_string()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use valloc_domain::model::EmployeeView;
    use valloc_domain::service::VehicleSummary;
    use valloc_types::EntityKind;

    fn report() -> AllocationReport {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        AllocationReport {
            total_records: 2,
            allocations: vec![
                ReportEntry {
                    allocation_id: "a1".to_string(),
                    date,
                    employee: Some(EmployeeView {
                        id: "e1".to_string(),
                        name: "John Doe".to_string(),
                        department: "Sales".to_string(),
                    }),
                    vehicle: Some(VehicleSummary {
                        id: "v1".to_string(),
                        make: "Toyota".to_string(),
                        model: "Camry".to_string(),
                        year: 2022,
                        license_plate: "ABC123".to_string(),
                    }),
                    driver: None,
                    missing: Vec::new(),
                },
                ReportEntry {
                    allocation_id: "a2".to_string(),
                    date,
                    employee: None,
                    vehicle: None,
                    driver: None,
                    missing: vec![EntityKind::Employee, EntityKind::Vehicle],
                },
            ],
        }
    }

    #[test]
    fn test_csv_has_header_and_row_per_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_to_csv(&report(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), HEADERS.len());
        assert_eq!(&headers[1], "Date");

        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "John Doe");
        assert_eq!(&rows[0][9], "ABC123");
        assert_eq!(&rows[1][3], "");
    }

    #[test]
    fn test_excel_file_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_to_excel(&report(), &ReportFilter::default(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
