//! Statement file rendering.
//!
//! CSV goes through the `csv` crate. PDF is a minimal hand-assembled
//! single-page document: one Helvetica text stream plus the object table and
//! xref a PDF 1.4 reader expects. Statements longer than a page are truncated
//! with a trailing count; callers wanting the full history use CSV.

use crate::errors::Result;

use super::reporting_model::Statement;

/// Statement lines rendered on the single PDF page before truncation.
const PDF_MAX_LINES: usize = 40;

pub(super) fn to_csv(statement: &Statement) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Date",
            "Type",
            "Description",
            "Amount",
            "Currency",
            "Running Balance",
            "Transaction ID",
        ])
        .map_err(|e| crate::errors::Error::Unexpected(e.to_string()))?;
    for line in &statement.lines {
        writer
            .write_record([
                line.date.to_rfc3339(),
                line.kind.to_string(),
                line.description.clone().unwrap_or_default(),
                line.amount.to_string(),
                statement.currency.to_string(),
                line.running_balance.to_string(),
                line.transaction_id.to_string(),
            ])
            .map_err(|e| crate::errors::Error::Unexpected(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::errors::Error::Unexpected(e.to_string()))
}

pub(super) fn to_pdf(statement: &Statement) -> Vec<u8> {
    let mut text = Vec::new();
    text.push("Account Statement".to_string());
    text.push(String::new());
    text.push(format!("Wallet: {}", statement.wallet_id));
    text.push(format!(
        "Period: {} to {} ({})",
        statement.start_date, statement.end_date, statement.currency
    ));
    text.push(format!(
        "Opening balance: {}   Closing balance: {}",
        statement.opening_balance, statement.closing_balance
    ));
    text.push(String::new());

    for line in statement.lines.iter().take(PDF_MAX_LINES) {
        text.push(format!(
            "{}  {:<10}  {:>14}  {:>14}  {}",
            line.date.format("%Y-%m-%d"),
            line.kind,
            line.amount,
            line.running_balance,
            line.description.as_deref().unwrap_or("-")
        ));
    }
    if statement.lines.len() > PDF_MAX_LINES {
        text.push(format!(
            "... and {} more transaction(s), see CSV export",
            statement.lines.len() - PDF_MAX_LINES
        ));
    }

    render_pdf_page(&text)
}

/// Escapes a string for a PDF literal string `( ... )`.
fn escape_pdf_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            // Helvetica in the default encoding has no glyphs outside Latin-1.
            c if (c as u32) > 0xFF => out.push('?'),
            c => out.push(c),
        }
    }
    out
}

/// Assembles a single-page PDF with one text line per entry.
fn render_pdf_page(lines: &[String]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 10 Tf\n12 TL\n50 760 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("T*\n");
        }
        content.push_str(&format!("({}) Tj\n", escape_pdf_text(line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
    ];

    let mut pdf: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}
