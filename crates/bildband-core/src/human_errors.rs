// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the front end.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the notice is presented.

use crate::error::BildbandError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only some images were affected; the document was still produced.
    Warning,
    /// User must fix the request (pick a folder, type a title).
    ActionRequired,
    /// The run cannot succeed as configured.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `BildbandError` into a `HumanError`.
pub fn humanize_error(err: &BildbandError) -> HumanError {
    match err {
        BildbandError::Validation { field, reason } => HumanError {
            message: match *field {
                "source_dir" => "Please choose a folder of images.".into(),
                "dest_dir" => "Please choose where to save the PDF.".into(),
                "title" => "Please type a title for the document.".into(),
                other => format!("Please fill in {other}."),
            },
            suggestion: capitalise(reason),
            severity: Severity::ActionRequired,
        },

        BildbandError::EmptyInput { directory } => HumanError {
            message: "No pictures were found in that folder.".into(),
            suggestion: format!(
                "Check that {} contains JPEG, PNG, GIF, BMP, TIFF, WebP, ICO or PNM files.",
                directory.display()
            ),
            severity: Severity::ActionRequired,
        },

        BildbandError::ImageProcessing { name, .. } => HumanError {
            message: format!("The picture \"{name}\" was left out."),
            suggestion: "The file may be damaged or in an unusual format. Try opening it in another program and saving it as JPEG or PNG.".into(),
            severity: Severity::Warning,
        },

        BildbandError::Sink(detail) => HumanError {
            message: "The PDF couldn't be saved.".into(),
            suggestion: format!("Make sure the destination folder exists and you can write to it. ({detail})"),
            severity: Severity::Permanent,
        },

        BildbandError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: capitalise(detail),
            severity: Severity::Permanent,
        },

        BildbandError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON, or remove it to use the defaults.".into(),
            severity: Severity::Permanent,
        },

        BildbandError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A folder or file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing it again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Bildband doesn't have permission to use that folder.".into(),
                    suggestion: "Check the folder permissions, or copy the pictures somewhere you own.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Permanent,
                }
            }
        }
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
