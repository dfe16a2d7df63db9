//! Placeholder PDF generation for machines without a LaTeX installation.
//!
//! The template is a single-page PDF-1.1 document that prints the document
//! name. Only two things change between documents: the name inside the
//! content stream and the `startxref` value. The name sits before the xref
//! table, so every byte of name shifts the table by one byte.
//!
//! ```text
//! %PDF-1.1 ... 4 0 obj << /Length 59 >> stream ... ({NAME}) Tj ... endobj
//! xref                     <- byte 558 + len(name)
//! 0 5 ...
//! startxref
//! {STARTXREF}
//! %%EOF
//! ```

use crate::log;
use anyhow::{Context, Result};
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

/// Byte offset of the `xref` keyword when the name is empty.
pub const XREF_OFFSET: usize = 558;

const PLACEHOLDER_NAME: &str = "{NAME}";
const PLACEHOLDER_STARTXREF: &str = "{STARTXREF}";

/// Object offsets in the xref table assume the UTF-8 encoding of the binary
/// marker line (`%¥±ë` is 7 bytes).
const TEMPLATE: &str = concat!(
    "%PDF-1.1\n",
    "%¥±ë\n",
    "\n",
    "1 0 obj\n",
    "  << /Type /Catalog\n",
    "     /Pages 2 0 R\n",
    "  >>\n",
    "endobj\n",
    "\n",
    "2 0 obj\n",
    "  << /Type /Pages\n",
    "     /Kids [3 0 R]\n",
    "     /Count 1\n",
    "     /MediaBox [0 0 595 842]\n",
    "  >>\n",
    "endobj\n",
    "\n",
    "3 0 obj\n",
    "  <<  /Type /Page\n",
    "      /Parent 2 0 R\n",
    "      /Resources\n",
    "       << /Font\n",
    "           << /F1\n",
    "               << /Type /Font\n",
    "                  /Subtype /Type1\n",
    "                  /BaseFont /Times-Roman\n",
    "               >>\n",
    "           >>\n",
    "       >>\n",
    "      /Contents 4 0 R\n",
    "  >>\n",
    "endobj\n",
    "\n",
    "4 0 obj\n",
    "  << /Length 59 >>\n",
    "stream\n",
    "  BT\n",
    "    /F1 18 Tf\n",
    "    240 440 Td\n",
    "    ({NAME}) Tj\n",
    "  ET\n",
    "endstream\n",
    "endobj\n",
    "\n",
    "xref\n",
    "0 5\n",
    "0000000000 65535 f \n",
    "0000000018 00000 n \n",
    "0000000077 00000 n \n",
    "0000000178 00000 n \n",
    "0000000457 00000 n \n",
    "trailer\n",
    "  <<  /Root 1 0 R\n",
    "      /Size 5\n",
    "  >>\n",
    "startxref\n",
    "{STARTXREF}\n",
    "%%EOF\n",
);

/// The `startxref` value for the text placed in the content stream.
pub const fn startxref(text: &str) -> usize {
    XREF_OFFSET + text.len()
}

/// Escape the characters that would end or corrupt a PDF literal string.
fn escape_pdf_string(name: &str) -> Cow<'_, str> {
    if !name.contains(['(', ')', '\\']) {
        return Cow::Borrowed(name);
    }
    let mut escaped = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Render the placeholder PDF for `name`.
pub fn render(name: &str) -> String {
    let text = escape_pdf_string(name);
    TEMPLATE
        .replace(PLACEHOLDER_NAME, &text)
        .replace(PLACEHOLDER_STARTXREF, &startxref(&text).to_string())
}

/// Write `<output_dir>/<name>.pdf`, replacing any existing file.
///
/// Failures are logged and swallowed; the returned path is `None` then.
pub fn synthesize(name: &str, output_dir: &Path) -> Option<PathBuf> {
    let output = output_dir.join(format!("{name}.pdf"));
    log!("dummy"; "{} (startxref {})", output.display(), startxref(&escape_pdf_string(name)));

    match write_pdf(&output, &render(name)) {
        Ok(()) => Some(output),
        Err(e) => {
            log!("error"; "failed to generate dummy PDF: {:#}", e);
            None
        }
    }
}

fn write_pdf(output: &Path, pdf: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, pdf).with_context(|| format!("Failed to write {}", output.display()))
}
