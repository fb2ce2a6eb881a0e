//! FreeDesktop.org desktop entries and man pages shared by the Linux packagers.

use crate::bundler::settings::ProductSettings;
use crate::version::BuildContext;
use std::fmt::Write;

/// Desktop entry file name, `<package>.desktop`.
pub fn desktop_file_name(product: &ProductSettings) -> String {
    format!("{}.desktop", product.package_name)
}

/// Renders the `.desktop` entry launching the GUI executable.
pub fn desktop_entry(product: &ProductSettings) -> String {
    let mime_types: String = product
        .document_types
        .iter()
        .map(|doc| format!("{};", doc.mime_type))
        .collect();
    let categories: String = product.categories.iter().map(|c| format!("{c};")).collect();

    let mut entry = String::new();
    let _ = writeln!(entry, "[Desktop Entry]");
    let _ = writeln!(entry, "Name={}", product.name);
    let _ = writeln!(entry, "Comment={}", product.short_description);
    let _ = writeln!(entry, "GenericName=Dictionary");
    let _ = writeln!(entry, "Exec={} %F", product.gui_executable);
    let _ = writeln!(entry, "Icon={}", product.package_name);
    let _ = writeln!(entry, "Type=Application");
    let _ = writeln!(entry, "Categories={categories}");
    let _ = writeln!(entry, "MimeType={mime_types}");
    let _ = writeln!(entry, "StartupWMClass={}", product.name);
    let _ = writeln!(entry, "StartupNotify=true");
    entry
}

/// Escapes hyphens for roff.
fn roff(text: &str) -> String {
    text.replace('-', "\\-")
}

/// Renders a section 1 man page for `executable`.
///
/// The header carries the build month and year and the release version.
pub fn man_page(product: &ProductSettings, context: &BuildContext, executable: &str) -> String {
    let is_gui = executable == product.gui_executable;
    let summary = if is_gui {
        format!("{} with graphical interface", product.short_description)
    } else {
        format!("{} for the command line", product.short_description)
    };
    let see_also: Vec<String> = product
        .executables()
        .iter()
        .filter(|exe| **exe != executable)
        .map(|exe| format!("{}(1)", roff(exe)))
        .collect();
    let exe = roff(executable);

    let mut page = String::new();
    let _ = writeln!(
        page,
        ".TH {} 1 \"{}\" \"{} {}\" \"User Commands\"",
        exe.to_uppercase(),
        context.build_date().format("%B %Y"),
        product.name,
        context.version()
    );
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH NAME");
    let _ = writeln!(page, "{exe} \\- {summary}");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH SYNOPSIS");
    let _ = writeln!(page, ".B {exe}");
    let _ = writeln!(page, ".RI [options] [dictionary_files...]");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH DESCRIPTION");
    let _ = writeln!(
        page,
        "{} is a cross-platform dictionary application supporting multiple formats",
        product.name
    );
    let _ = writeln!(
        page,
        "including MDict (.mdx/.mdd), StarDict (.ifo/.idx/.dict), DSL, and JSON."
    );
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH OPTIONS");
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".B \\-d, \\-\\-dict <path>");
    let _ = writeln!(
        page,
        "Load dictionary file(s). Multiple dictionaries can be specified."
    );
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".B \\-h, \\-\\-help");
    let _ = writeln!(page, "Show help information.");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH ENVIRONMENT");
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".B UNIDICT_DICTS");
    let _ = writeln!(page, "Colon-separated list of dictionary file paths.");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH FILES");
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".I ~/.local/share/{}/", product.package_name);
    let _ = writeln!(
        page,
        "User data directory for dictionaries, vocabulary, and cache."
    );
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".I /usr/share/{}/", product.package_name);
    let _ = writeln!(page, "System-wide dictionary directory.");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH EXAMPLES");
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".B {exe}");
    let _ = writeln!(page, "Start with default settings.");
    let _ = writeln!(page, ".TP");
    let _ = writeln!(page, ".B {exe} \\-d /path/to/dict.mdx");
    let _ = writeln!(page, "Start with a specific dictionary loaded.");
    let _ = writeln!(page);
    let _ = writeln!(page, ".SH AUTHOR");
    let _ = writeln!(page, "{}", product.maintainer);
    if !see_also.is_empty() {
        let _ = writeln!(page);
        let _ = writeln!(page, ".SH SEE ALSO");
        let _ = writeln!(page, ".BR {}", see_also.join(", "));
    }
    let _ = writeln!(page);
    let _ = writeln!(page, "Full documentation at: <{}>", product.homepage);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn desktop_entry_lists_mime_types_and_categories() {
        let entry = desktop_entry(&ProductSettings::default());
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=unidict_qml %F\n"));
        assert!(entry.contains("Icon=unidict\n"));
        assert!(entry.contains("Categories=Education;Office;Dictionary;\n"));
        assert!(entry.contains("MimeType=application/x-mdict;application/x-stardict;\n"));
    }

    #[test]
    fn man_page_header_uses_build_month_and_version() {
        let product = ProductSettings::default();
        let context = BuildContext::new(
            "1.2.3",
            "abc",
            NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
        );
        let page = man_page(&product, &context, "unidict_cli");
        assert!(page.starts_with(
            ".TH UNIDICT_CLI 1 \"November 2024\" \"Unidict 1.2.3\" \"User Commands\"\n"
        ));
        assert!(
            page.contains("unidict_cli \\- Universal dictionary lookup tool for the command line")
        );
        assert!(page.contains(".BR unidict_qml(1)"));
    }
}
