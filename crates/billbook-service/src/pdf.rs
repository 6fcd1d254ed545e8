//! Invoice PDF rendering.
//!
//! Renders an invoice to a single A4 page with the builtin Helvetica fonts,
//! entirely in memory. The layout mirrors the printed tax-invoice form:
//! company letterhead, buyer/consignee blocks, line-item table, and totals.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use billbook_core::Invoice;

use crate::config::CompanyProfile;

/// Errors that can occur while rendering a PDF.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The underlying PDF writer failed.
    #[error("pdf rendering failed: {0}")]
    Document(String),

    /// The invoice has more line items than fit on one page.
    #[error("invoice has too many line items for a single page")]
    PageOverflow,
}

/// Table column x-positions in millimeters.
const X_INDEX: f32 = 15.0;
const X_DESC: f32 = 25.0;
const X_HSN: f32 = 105.0;
const X_QTY: f32 = 128.0;
const X_RATE: f32 = 148.0;
const X_AMOUNT: f32 = 175.0;

/// Render an invoice to PDF bytes.
///
/// # Errors
///
/// Returns `PdfError::PageOverflow` if the line items run past the single
/// page, or `PdfError::Document` if the writer fails.
pub fn render(invoice: &Invoice, company: &CompanyProfile) -> Result<Vec<u8>, PdfError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Tax Invoice", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Document(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Document(e.to_string()))?;

    let mut y: f32 = 285.0;

    // Letterhead (left)
    push_line(&layer, &font_bold, &company.name, 16.0, 15.0, y);
    y -= 7.0;
    push_line(&layer, &font, &company.address, 10.0, 15.0, y);
    y -= 5.0;
    push_line(
        &layer,
        &font,
        &format!("GSTIN: {}", company.gstin),
        10.0,
        15.0,
        y,
    );
    y -= 5.0;
    push_line(
        &layer,
        &font,
        &format!("State: {} (Code {})", company.state, company.state_code),
        10.0,
        15.0,
        y,
    );

    // Title block (right)
    push_line(&layer, &font_bold, "TAX INVOICE", 22.0, 140.0, 285.0);
    push_line(&layer, &font_bold, &invoice.invoice_number, 12.0, 140.0, 277.0);
    push_line(
        &layer,
        &font,
        &format!("Date: {}", invoice.invoice_date.format("%d-%m-%Y")),
        10.0,
        140.0,
        271.0,
    );
    if let Some(po) = &invoice.po_number {
        push_line(&layer, &font, &format!("PO: {po}"), 10.0, 140.0, 266.0);
    }

    y = 258.0;
    divider(&layer, y);

    // Buyer (left) and consignee (right)
    y -= 8.0;
    push_line(&layer, &font_bold, "Buyer:", 11.0, 15.0, y);
    push_line(&layer, &font_bold, "Consignee:", 11.0, 110.0, y);

    y -= 6.0;
    push_line(&layer, &font, &invoice.buyer.name, 10.0, 15.0, y);
    push_line(&layer, &font, &invoice.consignee.name, 10.0, 110.0, y);

    y -= 5.0;
    push_line(
        &layer,
        &font,
        &format!("GSTIN: {}", invoice.buyer.gstin),
        10.0,
        15.0,
        y,
    );
    push_line(
        &layer,
        &font,
        &format!("GSTIN: {}", invoice.consignee.gstin),
        10.0,
        110.0,
        y,
    );

    y -= 5.0;
    if let Some(address) = &invoice.buyer.address {
        push_line(&layer, &font, address, 9.0, 15.0, y);
    }
    if let Some(address) = &invoice.consignee.address {
        push_line(&layer, &font, address, 9.0, 110.0, y);
    }

    // Line item table
    y -= 12.0;
    push_line(&layer, &font_bold, "#", 10.0, X_INDEX, y);
    push_line(&layer, &font_bold, "Description", 10.0, X_DESC, y);
    push_line(&layer, &font_bold, "HSN", 10.0, X_HSN, y);
    push_line(&layer, &font_bold, "Qty", 10.0, X_QTY, y);
    push_line(&layer, &font_bold, "Rate", 10.0, X_RATE, y);
    push_line(&layer, &font_bold, "Amount", 10.0, X_AMOUNT, y);

    y -= 3.5;
    divider(&layer, y);
    y -= 7.0;

    for (idx, line) in invoice.items.iter().enumerate() {
        if y < 70.0 {
            return Err(PdfError::PageOverflow);
        }

        push_line(&layer, &font, &format!("{}", idx + 1), 10.0, X_INDEX, y);
        push_line(&layer, &font, &line.name, 10.0, X_DESC, y);
        push_line(&layer, &font, &line.hsn, 10.0, X_HSN, y);
        push_line(
            &layer,
            &font,
            &format!("{:.2} {}", line.quantity, line.uom),
            10.0,
            X_QTY,
            y,
        );
        push_line(&layer, &font, &format_money(line.rate), 10.0, X_RATE, y);
        push_line(&layer, &font, &format_money(line.amount), 10.0, X_AMOUNT, y);

        y -= 6.0;
    }

    y -= 2.0;
    divider(&layer, y);

    // Totals
    y -= 8.0;
    let totals = &invoice.totals;
    let mut total_row = |label: &str, value: String, bold: bool| {
        let f = if bold { &font_bold } else { &font };
        push_line(&layer, f, label, 10.0, 140.0, y);
        push_line(&layer, f, &value, 10.0, X_AMOUNT, y);
        y -= 6.0;
    };

    total_row("Subtotal:", format_money(totals.subtotal), false);
    total_row("SGST:", format_money(totals.sgst), false);
    total_row("CGST:", format_money(totals.cgst), false);
    total_row("Round off:", format_money(totals.round_off), false);
    #[allow(clippy::cast_precision_loss)]
    total_row("Total:", format_money(totals.rounded_total as f64), true);

    if let Some(words) = &totals.amount_in_words {
        push_line(&layer, &font, &format!("Amount in words: {words}"), 9.0, 15.0, y);
    }

    // Signature block
    push_line(&layer, &font, &format!("for {}", company.name), 10.0, 140.0, 30.0);
    push_line(&layer, &font, "Authorised Signatory", 10.0, 140.0, 15.0);

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| PdfError::Document(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| PdfError::Document(e.to_string()))
}

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(15.0), Mm(y)), false),
            (Point::new(Mm(195.0), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn format_money(v: f64) -> String {
    let s = format!("{v:.2}");
    let (int_part, dec_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::new();
    let chars: Vec<char> = int_part.chars().collect();
    let mut count = 0;
    for i in (0..chars.len()).rev() {
        if count == 3 && chars[i] != '-' {
            grouped.push(',');
            count = 0;
        }
        grouped.push(chars[i]);
        count += 1;
    }
    let int_with_sep: String = grouped.chars().rev().collect();
    format!("{int_with_sep}.{dec_part}")
}
