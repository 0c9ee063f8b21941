// src/services/document_service.rs

use genpdf::{elements, style, Alignment, Element};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{common::error::AppError, models::operations::OrderDetail};

pub const FONT_FAMILY: &str = "Roboto";

// Recibos em PDF. A fonte vem de FONTS_DIR (Roboto-Regular.ttf, Roboto-Bold.ttf...).
#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(fonts_dir: String) -> Self {
        Self { fonts_dir }
    }

    pub async fn order_receipt_pdf(&self, business_name: String, detail: OrderDetail) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        let order_id = detail.header.id;

        // genpdf lê arquivos e faz layout de forma síncrona
        let bytes = tokio::task::spawn_blocking(move || render_receipt(&fonts_dir, &business_name, &detail))
            .await
            .map_err(|e| AppError::InternalServerError(e.into()))??;

        tracing::info!("🧾 Recibo do pedido {} gerado ({} bytes)", order_id, bytes.len());
        Ok(bytes)
    }
}

fn money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn document_error(e: genpdf::error::Error) -> AppError {
    AppError::DocumentError(e.to_string())
}

fn render_receipt(fonts_dir: &str, business_name: &str, detail: &OrderDetail) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None)
        .map_err(|_| AppError::FontNotFound(format!("{} em {}", FONT_FAMILY, fonts_dir)))?;

    let header = &detail.header;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Receipt {}", header.order_name));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- Cabeçalho ---
    doc.push(elements::Paragraph::new(business_name).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Paragraph::new(format!("Branch: {}", detail.branch_name)).styled(style::Style::new().with_font_size(10)));
    doc.push(elements::Break::new(1.5));

    doc.push(
        elements::Paragraph::new(format!("ORDER {}", header.order_name))
            .styled(style::Style::new().bold().with_font_size(14)),
    );
    doc.push(elements::Paragraph::new(format!("Date: {}", header.ordered_at.format("%Y-%m-%d %H:%M"))));
    doc.push(elements::Paragraph::new(format!(
        "Customer: {}",
        detail.customer_name.as_deref().unwrap_or("Walk-in customer")
    )));
    doc.push(elements::Break::new(2));

    // --- Itens ---
    let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Item").styled(bold))
        .element(elements::Paragraph::new("Qty").styled(bold))
        .element(elements::Paragraph::new("Unit").styled(bold))
        .element(elements::Paragraph::new("Total").styled(bold))
        .push()
        .map_err(document_error)?;

    for line in &detail.items {
        table
            .row()
            .element(elements::Paragraph::new(line.item_name.as_str()))
            .element(elements::Paragraph::new(line.quantity.to_string()))
            .element(elements::Paragraph::new(money(line.unit_price)))
            .element(elements::Paragraph::new(money(line.total_price)))
            .push()
            .map_err(document_error)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- Totais ---
    for (label, value, emphasis) in [
        ("TOTAL", header.total_amount, true),
        ("Paid", detail.amount_paid, false),
        ("Balance", detail.balance, false),
    ] {
        let mut paragraph = elements::Paragraph::new(format!("{}: {}", label, money(value)));
        paragraph.set_alignment(Alignment::Right);
        let text_style = if emphasis {
            style::Style::new().bold().with_font_size(12)
        } else {
            style::Style::new().with_font_size(10)
        };
        doc.push(paragraph.styled(text_style));
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(document_error)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operations::Order;
    use chrono::Utc;
    use uuid::Uuid;

    fn detail() -> OrderDetail {
        OrderDetail {
            header: Order {
                id: Uuid::new_v4(),
                business_id: Uuid::new_v4(),
                branch_id: Uuid::new_v4(),
                customer_id: None,
                user_id: Uuid::new_v4(),
                order_name: "A-100".to_string(),
                ordered_at: Utc::now(),
                total_amount: Decimal::new(2500, 2),
                is_completed: true,
                is_deleted: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            branch_name: "Downtown".to_string(),
            customer_name: None,
            items: vec![],
            amount_paid: Decimal::ZERO,
            balance: Decimal::new(2500, 2),
        }
    }

    #[tokio::test]
    async fn missing_fonts_are_reported() {
        let service = DocumentService::new("./no-such-fonts-dir".to_string());

        let result = service.order_receipt_pdf("Acme".to_string(), detail()).await;

        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }

    #[test]
    fn money_keeps_two_decimals() {
        assert_eq!(money(Decimal::new(5, 0)), "5.00");
        assert_eq!(money(Decimal::new(12345, 3)), "12.35");
    }
}
