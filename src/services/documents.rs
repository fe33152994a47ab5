//! Printable service order, rendered as an A4 PDF with the built-in Helvetica fonts.
//!
//! Logos are drawn as framed slots captioned with their URL; remote images are not
//! fetched.

use crate::{
    errors::ServiceError,
    models::{CompanyProfile, LogoPosition},
};
use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use super::service_orders::ServiceOrderDetail;

pub const DEFAULT_LEFT_LOGO: &str =
    "https://pre-built-images.s3.amazonaws.com/webapp-uploads/ef9806262b9611b81517e59e9c83c55d.png";
pub const DEFAULT_RIGHT_LOGO: &str =
    "https://pre-built-images.s3.amazonaws.com/webapp-uploads/2be59b864e2eed0fb47e01b1739f4192.jpeg";

const NOT_SPECIFIED: &str = "Não especificado";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const FOOTER_HEIGHT: f32 = 22.0;
const LOGO_WIDTH: f32 = 40.0;
const LOGO_HEIGHT: f32 = 20.0;
const VALUE_OFFSET: f32 = 58.0;
const PT_TO_MM: f32 = 0.3528;

/// `ordem-servico-00042-2025.pdf` for order `00042/2025`. Only the first slash is
/// replaced.
pub fn filename(number: &str) -> String {
    format!("ordem-servico-{}.pdf", number.replacen('/', "-", 1))
}

fn document_error(err: printpdf::Error) -> ServiceError {
    ServiceError::DocumentError(err.to_string())
}

/// Approximate Helvetica advance, good enough for wrapping and centring
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * 0.5 * PT_TO_MM)) as usize).max(8);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(head);
            }
            let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
    footer: Vec<String>,
}

impl PageWriter {
    fn new(title: &str, footer: Vec<String>) -> Result<Self, ServiceError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Página 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(document_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(document_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        let writer = Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
            footer,
        };
        writer.draw_footer();
        Ok(writer)
    }

    fn draw_footer(&self) {
        let mut y = MARGIN - 4.0 + 4.0 * self.footer.len() as f32;
        for line in &self.footer {
            self.centered(line, 8.0, false, y);
            y -= 4.0;
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Página {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.draw_footer();
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN + FOOTER_HEIGHT {
            self.new_page();
        }
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn text_at(&self, text: &str, size: f32, bold: bool, x: f32, y: f32) {
        self.layer
            .use_text(text, size, Mm(x), Mm(y), self.font(bold));
    }

    fn centered(&self, text: &str, size: f32, bold: bool, y: f32) {
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(MARGIN);
        self.text_at(text, size, bold, x, y);
    }

    fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * 1.45
    }

    fn centered_line(&mut self, text: &str, size: f32, bold: bool) {
        let height = Self::line_height(size);
        self.ensure_space(height);
        self.y -= height;
        self.centered(text, size, bold, self.y);
    }

    fn paragraph(&mut self, text: &str, size: f32, x: f32) {
        let height = Self::line_height(size);
        for line in wrap(text, PAGE_WIDTH - MARGIN - x, size) {
            self.ensure_space(height);
            self.y -= height;
            self.text_at(&line, size, false, x, self.y);
        }
    }

    fn stroke(&self, points: &[(f32, f32)], closed: bool) {
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: points
                .iter()
                .map(|(x, y)| (Point::new(Mm(*x), Mm(*y)), false))
                .collect(),
            is_closed: closed,
        });
    }

    fn rule(&mut self) {
        self.y -= 2.0;
        self.stroke(&[(MARGIN, self.y), (PAGE_WIDTH - MARGIN, self.y)], false);
        self.y -= 2.0;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn heading(&mut self, title: &str) {
        self.ensure_space(14.0);
        self.gap(4.0);
        self.y -= Self::line_height(11.0);
        self.text_at(title, 11.0, true, MARGIN, self.y);
        self.rule();
    }

    fn field(&mut self, label: &str, value: &str) {
        let size = 9.0;
        let height = Self::line_height(size);
        let lines = wrap(value, PAGE_WIDTH - MARGIN - (MARGIN + VALUE_OFFSET), size);
        self.ensure_space(height);
        self.y -= height;
        self.text_at(&format!("{}:", label), size, true, MARGIN, self.y);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.ensure_space(height);
                self.y -= height;
            }
            self.text_at(line, size, false, MARGIN + VALUE_OFFSET, self.y);
        }
    }

    fn logo_slot(&self, x: f32, top: f32, url: &str) {
        let bottom = top - LOGO_HEIGHT;
        self.stroke(
            &[
                (x, bottom),
                (x + LOGO_WIDTH, bottom),
                (x + LOGO_WIDTH, top),
                (x, top),
            ],
            true,
        );
        self.text_at("LOGO", 7.0, true, x + 2.0, top - 4.0);
        let mut y = top - 8.0;
        for line in wrap(url, LOGO_WIDTH - 4.0, 4.5).into_iter().take(5) {
            self.text_at(&line, 4.5, false, x + 2.0, y);
            y -= 2.2;
        }
    }

    fn finish(self) -> Result<Vec<u8>, ServiceError> {
        self.doc.save_to_bytes().map_err(document_error)
    }
}

fn contact_line(phone: Option<&str>, email: Option<&str>) -> Option<String> {
    let parts: Vec<String> = [
        phone.filter(|p| !p.is_empty()).map(|p| format!("Tel: {}", p)),
        email.filter(|e| !e.is_empty()).map(|e| format!("Email: {}", e)),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Renders the printable service order.
///
/// Without a company the header keeps the logo slots and omits the company block.
pub fn render_service_order(
    detail: &ServiceOrderDetail,
    company: Option<&CompanyProfile>,
    generated_on: NaiveDate,
) -> Result<Vec<u8>, ServiceError> {
    let order = &detail.order;
    let company_record = company.and_then(|c| c.company.as_ref());

    let mut footer = vec![format!(
        "Documento gerado em {}",
        generated_on.format("%d/%m/%Y")
    )];
    if let Some(c) = company_record {
        footer.push(format!("{} - {}", c.name, order.created_at.format("%d/%m/%Y")));
    }

    let mut page = PageWriter::new(&format!("Ordem de Serviço {}", order.number), footer)?;

    // Header
    let top = page.y;
    let left_logo = company
        .and_then(|c| c.logo_url(LogoPosition::Left))
        .unwrap_or(DEFAULT_LEFT_LOGO);
    let right_logo = company
        .and_then(|c| c.logo_url(LogoPosition::Right))
        .unwrap_or(DEFAULT_RIGHT_LOGO);
    page.logo_slot(MARGIN, top, left_logo);
    page.logo_slot(PAGE_WIDTH - MARGIN - LOGO_WIDTH, top, right_logo);

    if let Some(c) = company_record {
        let mut y = top - 5.0;
        page.centered(&c.name, 12.0, true, y);
        let details = [
            c.address.clone().filter(|a| !a.is_empty()),
            contact_line(c.phone.as_deref(), c.email.as_deref()),
            c.website.clone().filter(|w| !w.is_empty()),
        ];
        for line in details.iter().flatten() {
            y -= 4.5;
            page.centered(line, 8.0, false, y);
        }
    }
    page.y = top - LOGO_HEIGHT;
    page.rule();

    page.gap(2.0);
    page.centered_line("ORDEM DE SERVIÇO", 16.0, true);
    page.centered_line(&format!("Nº {}", order.number), 12.0, true);
    page.centered_line(&format!("Status: {}", order.status.label()), 10.0, false);

    let employee = detail.employee.as_ref();
    page.heading("Informações Gerais");
    page.field(
        "Data de Criação",
        &order.created_at.format("%d/%m/%Y").to_string(),
    );
    page.field(
        "Funcionário Responsável",
        employee.map_or(NOT_SPECIFIED, |e| e.name.as_str()),
    );
    page.field("DRT", employee.map_or(NOT_SPECIFIED, |e| e.drt.as_str()));
    page.field("Função", employee.map_or(NOT_SPECIFIED, |e| e.role.as_str()));

    page.heading("Detalhes da Inspeção");
    page.field(
        "Categoria de Equipamento",
        detail
            .equipment_category
            .as_ref()
            .map_or(NOT_SPECIFIED, |c| c.name.as_str()),
    );
    page.field(
        "Categoria de Inspeção",
        detail
            .inspection_category
            .as_ref()
            .map_or(NOT_SPECIFIED, |c| c.name.as_str()),
    );
    page.field(
        "Checklist",
        detail
            .checklist
            .as_ref()
            .map_or(NOT_SPECIFIED, |c| c.name.as_str()),
    );

    if !order.observations.trim().is_empty() {
        page.heading("Observações");
        page.paragraph(&order.observations, 9.0, MARGIN);
    }

    if let Some(checklist) = detail.checklist.as_ref().filter(|c| !c.items.is_empty()) {
        page.heading("Itens do Checklist");
        for (i, item) in checklist.items.iter().enumerate() {
            let text = match item.kind.suffix() {
                Some(suffix) => format!("{}. {} {}", i + 1, item.question, suffix),
                None => format!("{}. {}", i + 1, item.question),
            };
            page.paragraph(&text, 9.0, MARGIN + 2.0);
        }
    }

    page.ensure_space(32.0);
    page.gap(22.0);
    let signature_width = 70.0;
    let right_x = PAGE_WIDTH - MARGIN - signature_width;
    page.stroke(&[(MARGIN, page.y), (MARGIN + signature_width, page.y)], false);
    page.stroke(&[(right_x, page.y), (right_x + signature_width, page.y)], false);
    page.y -= 4.0;
    page.text_at("Responsável pela Execução", 9.0, false, MARGIN + 12.0, page.y);
    page.text_at("Responsável pela Aprovação", 9.0, false, right_x + 11.0, page.y);

    page.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnswerKind, Checklist, ChecklistItem, Company, CompanyLogo, Employee, ServiceOrder,
        ServiceOrderStatus,
    };
    use chrono::{TimeZone, Utc};

    fn detail(observations: &str, items: usize) -> ServiceOrderDetail {
        let checklist = Checklist {
            id: "c1".into(),
            category_id: "1".into(),
            name: "Geradores".into(),
            items: (0..items)
                .map(|i| ChecklistItem {
                    id: format!("g{}", i),
                    question: format!("Pergunta de verificação número {}", i),
                    kind: AnswerKind::Radio {
                        options: vec!["OK".into(), "NOK".into()],
                    },
                })
                .collect(),
        };
        ServiceOrderDetail {
            order: ServiceOrder {
                id: "o1".into(),
                number: "00042/2025".into(),
                employee_id: "e1".into(),
                equipment_category_id: "generator".into(),
                inspection_category_id: "1".into(),
                checklist_id: "c1".into(),
                observations: observations.into(),
                created_at: Utc.with_ymd_and_hms(2025, 3, 4, 8, 0, 0).unwrap(),
                status: ServiceOrderStatus::InProgress,
            },
            employee: Some(Employee {
                id: "e1".into(),
                name: "Carlos".into(),
                drt: "4521".into(),
                role: "Técnico".into(),
            }),
            equipment_category: None,
            inspection_category: None,
            checklist: Some(checklist),
            employee_name: "Carlos".into(),
            equipment_category_name: "Categoria não encontrada".into(),
            inspection_category_name: "Categoria não encontrada".into(),
            checklist_name: "Geradores".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    #[test]
    fn filename_replaces_first_slash_only() {
        assert_eq!(filename("00042/2025"), "ordem-servico-00042-2025.pdf");
        assert_eq!(filename("1/2/3"), "ordem-servico-1-2/3.pdf");
        assert_eq!(filename("manual"), "ordem-servico-manual.pdf");
    }

    #[test]
    fn renders_without_company() {
        let bytes = render_service_order(&detail("", 3), None, today()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_content_spills_onto_more_pages() {
        let profile = CompanyProfile {
            company: Some(Company {
                id: "co".into(),
                name: "Hospital Central".into(),
                address: Some("Rua A, 100".into()),
                phone: Some("11 5555-0000".into()),
                email: None,
                website: None,
            }),
            logos: vec![CompanyLogo {
                id: "l".into(),
                company_id: "co".into(),
                logo_url: "https://cdn.example.com/logo.png".into(),
                logo_position: LogoPosition::Left,
            }],
        };
        let observations = "Vazamento identificado na linha de retorno. ".repeat(60);
        let short = render_service_order(&detail("", 1), Some(&profile), today()).unwrap();
        let long = render_service_order(&detail(&observations, 120), Some(&profile), today()).unwrap();

        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }

    #[test]
    fn wrapping_respects_width_and_splits_long_words() {
        let lines = wrap(&"palavra ".repeat(40), 40.0, 9.0);
        assert!(lines.len() > 1);
        let max = ((40.0 / (9.0 * 0.5 * PT_TO_MM)) as usize).max(8);
        assert!(lines.iter().all(|l| l.chars().count() <= max));

        let url = wrap(DEFAULT_LEFT_LOGO, 36.0, 4.5);
        assert_eq!(url.concat(), DEFAULT_LEFT_LOGO);
    }

    #[test]
    fn contact_line_joins_present_parts() {
        assert_eq!(
            contact_line(Some("11 5555"), Some("a@b.com")).as_deref(),
            Some("Tel: 11 5555 | Email: a@b.com")
        );
        assert_eq!(contact_line(None, Some("a@b.com")).as_deref(), Some("Email: a@b.com"));
        assert_eq!(contact_line(Some(""), None), None);
    }
}
