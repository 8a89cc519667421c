use std::path::Path;
use tracing::info;

use toggl_report_util::{
    helpers::export, logger, ReportConfig, ReportError, ReportService,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_cli_logger(false);

    info!("Starting Toggl report example");

    // Text as it comes out of the PDF exports (in a real run, PdfTextSource reads the files)
    let text_source = |path: &Path| -> Result<String, ReportError> {
        let text = match path.to_str() {
            Some("2023-01-a.pdf") => "Summary Report 2023-01-01 - 2023-01-15 Total 61 h 20 min",
            Some("2023-01-b.pdf") => {
                "Summary Report January 16, 2023 – January 31, 2023 TOTAL HOURS: 70:05:00"
            }
            Some("2023-02.pdf") => "Detailed Report 02/01/2023 – 02/28/2023 Total 120 h 0 min",
            _ => "unreadable",
        };
        Ok(text.to_string())
    };

    let mut service = ReportService::new(text_source, ReportConfig::default());
    let outcome = service.process_documents(&[
        "2023-01-a.pdf",
        "2023-01-b.pdf",
        "broken.pdf",
        "2023-02.pdf",
    ]);

    for e in &outcome.errors {
        println!("error: {}", e);
    }

    print!("{}", export::render_summary(service.aggregates()));
    print!("{}", service.to_csv()?);

    Ok(())
}

/*
Running the example prints one error for broken.pdf, then:

2023-01-01 - 2023-01-15   131:25:00  (2 reports)
2023-02-01 - 2023-02-28   120:00:00  (1 report)
Period;Total Hours;Decimal Hours

2023-01-01 - 2023-01-15;131:25:00;131.41666666666666
2023-02-01 - 2023-02-28;120:00:00;120.0
*/
