//! Payslip page text builders and file fixtures.
//!
//! Page text mimics `pdftotext` output of a Brazilian payroll export: the
//! header block is flattened onto a few lines and the employee line reads
//! `<code> Código <NAME> Nome do Funcionário CBO <cbo>`.

use anyhow::Result;
use holerite::{Employee, PageText};
use std::fs;
use std::path::{Path, PathBuf};

/// Form feed separating pages in `pdftotext` output.
pub const FORM_FEED: &str = "\u{0C}";

/// Builder for the text of one payslip page.
///
/// # Example
///
/// ```no_run
/// let text = PayslipPageBuilder::new()
///     .with_employee(20, "AMANDA SANTOS COSTA", 212405)
///     .with_month("Janeiro 2025")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct PayslipPageBuilder {
    company: String,
    month: String,
    employee: Option<(u32, String, u32)>,
    extra_lines: Vec<String>,
    labels: bool,
}

impl PayslipPageBuilder {
    pub fn new() -> Self {
        Self {
            company: "ACQUA DISTRIBUIDORA LTDA".to_string(),
            month: "Janeiro 2025".to_string(),
            employee: None,
            extra_lines: Vec::new(),
            labels: true,
        }
    }

    /// Sets the employee line: code, name, CBO code.
    pub fn with_employee(mut self, code: u32, name: &str, cbo: u32) -> Self {
        self.employee = Some((code, name.to_string(), cbo));
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = company.to_string();
        self
    }

    pub fn with_month(mut self, month: &str) -> Self {
        self.month = month.to_string();
        self
    }

    /// Drops the "Código" and "Nome do Funcionário" labels.
    pub fn without_labels(mut self) -> Self {
        self.labels = false;
        self
    }

    pub fn with_line(mut self, line: &str) -> Self {
        self.extra_lines.push(line.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut lines = vec![
            self.company.clone(),
            format!(
                "Recibo de Pagamento de Salário Mensalista Referência {}",
                self.month
            ),
        ];

        if let Some((code, name, cbo)) = &self.employee {
            if self.labels {
                lines.push(format!(
                    "{} Código {} Nome do Funcionário CBO {}",
                    code, name, cbo
                ));
            } else {
                lines.push(format!("{} {} {}", code, name, cbo));
            }
        }

        lines.push("Cód. Descrição Referência Vencimentos Descontos".to_string());
        lines.push("001 Salário Base 30,00 3.120,00".to_string());
        lines.push("Total de Vencimentos Total de Descontos Valor Líquido".to_string());
        lines.extend(self.extra_lines.iter().cloned());
        lines.push("Declaro ter recebido a importância líquida discriminada neste recibo".to_string());
        lines.push("Assinatura do Funcionário".to_string());
        lines.join("\n")
    }

    pub fn build_page(&self, page_number: usize) -> PageText {
        PageText::new(page_number, self.build())
    }
}

impl Default for PayslipPageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Payslip page for `name` with default layout.
pub fn payslip(code: u32, name: &str) -> String {
    PayslipPageBuilder::new()
        .with_employee(code, name, 212405)
        .build()
}

/// Company birthday card; carries no employee name.
pub fn birthday_page() -> String {
    "ACQUA DISTRIBUIDORA LTDA\nPARABÉNS PELO SEU ANIVERSÁRIO\nFELIZ ANIVERSÁRIO DE TODA EQUIPE"
        .to_string()
}

/// Joins page texts the way `pdftotext` does, with a trailing form feed.
pub fn form_feed_document(pages: &[String]) -> String {
    let mut doc = pages.join(FORM_FEED);
    doc.push_str(FORM_FEED);
    doc
}

/// Directory shared by the integration tests.
pub fn sample_employees() -> Vec<Employee> {
    vec![
        Employee::new("Amanda Santos Costa").with_email("amanda.costa@example.com"),
        Employee::new("João Silva").with_email("joao.silva@example.com"),
        Employee::new("Ana Luiza dos Santos").with_slack_id("U094A8J5R2L"),
        Employee::new("Tomás Azevedo Santos")
            .with_email("tomas@example.com")
            .with_slack_id("U081ZP68CA1"),
        Employee::new("Leidiane Souza Ramos").with_email("leidiane@example.com"),
    ]
}

/// Writes a file under `dir` and returns its path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// Writes [`sample_employees`] as a JSON directory file.
pub fn write_directory(dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&sample_employees())?;
    write_file(dir, "employees.json", &json)
}
