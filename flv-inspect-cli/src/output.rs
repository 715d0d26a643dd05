use std::fmt::Write;

use amf0::{Amf0Property, Amf0Value};
use flv::{FlvInfo, MetaInfo, VideoDiagnostic};

const INDENT: &str = "    ";

/// Renders parse results as plain text.
pub struct OutputManager {
    show_metadata: bool,
    show_video_tags: bool,
}

impl OutputManager {
    pub fn new(show_metadata: bool, show_video_tags: bool) -> Self {
        Self {
            show_metadata,
            show_video_tags,
        }
    }

    pub fn format_report(&self, info: &FlvInfo, diagnostics: &[VideoDiagnostic]) -> String {
        let mut output = String::new();

        if self.show_video_tags {
            for diagnostic in diagnostics {
                let _ = writeln!(output, "{diagnostic}");
            }
            if !diagnostics.is_empty() {
                output.push('\n');
            }
        }

        let _ = writeln!(output, "{}\n", info.header);
        let _ = writeln!(output, "{}", info.body_info);

        if self.show_metadata {
            output.push('\n');
            match &info.meta_info {
                Some(meta) => output.push_str(&format_meta(meta)),
                None => output.push_str("No metadata\n"),
            }
        }

        output
    }
}

fn format_meta(meta: &MetaInfo) -> String {
    let mut output = String::from("Metadata:\n");
    for (key, properties) in meta.iter() {
        let _ = writeln!(output, "{key}:");
        for (name, value) in properties {
            write_property(&mut output, 1, name, value);
        }
    }
    output
}

fn write_property(output: &mut String, depth: usize, name: &str, value: &Amf0Value<'_>) {
    let indent = INDENT.repeat(depth);
    match value {
        Amf0Value::Object(props) | Amf0Value::EcmaArray(props) => {
            let _ = writeln!(output, "{indent}{name}:");
            write_properties(output, depth + 1, props);
        }
        Amf0Value::StrictArray(values) => {
            let _ = writeln!(output, "{indent}{name}: [{}]", values.len());
            for (i, value) in values.iter().enumerate() {
                write_property(output, depth + 1, &i.to_string(), value);
            }
        }
        scalar => {
            let _ = writeln!(output, "{indent}{name}: {}", format_scalar(scalar));
        }
    }
}

fn write_properties(output: &mut String, depth: usize, props: &[Amf0Property<'_>]) {
    for (name, value) in props {
        write_property(output, depth, name, value);
    }
}

fn format_scalar(value: &Amf0Value<'_>) -> String {
    match value {
        Amf0Value::Number(n) => n.to_string(),
        Amf0Value::Boolean(b) => b.to_string(),
        Amf0Value::String(s) | Amf0Value::LongString(s) => format!("{s:?}"),
        Amf0Value::Null => "null".to_string(),
        Amf0Value::Undefined => "undefined".to_string(),
        Amf0Value::Date {
            timestamp,
            timezone,
        } => format!("date({timestamp}, tz {timezone})"),
        Amf0Value::Object(props) | Amf0Value::EcmaArray(props) => format!("{{{} properties}}", props.len()),
        Amf0Value::StrictArray(values) => format!("[{} values]", values.len()),
    }
}
