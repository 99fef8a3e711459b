use clonedesign::dna_sequence::{EditSpan, Plasmid};
use clonedesign::primer_design::{
    generate_primer_set, DesignPreferences, OperationType, PrimerSet,
};
use clonedesign::primer_export;
use clonedesign::reconcile::reconcile;
use clonedesign::subcloning::generate_subcloning_set;
use serde::{Deserialize, Serialize};
use std::{env, fs};

#[derive(Deserialize)]
struct DesignRequest {
    operation: OperationType,
    /// 1-based start of the edited region.
    start: usize,
    /// 1-based inclusive end; omit for a pure insertion before `start`.
    #[serde(default)]
    end: Option<usize>,
    #[serde(default)]
    insert: String,
    #[serde(default)]
    preferences: DesignPreferences,
}

impl DesignRequest {
    fn edit_span(&self) -> EditSpan {
        match self.end {
            Some(end) => EditSpan::replacement(self.start, end),
            None => EditSpan::insertion_before(self.start),
        }
    }
}

#[derive(Deserialize)]
struct SubcloneRequest {
    start: usize,
    #[serde(default)]
    end: Option<usize>,
    /// The fragment being moved into the vector.
    target: String,
    #[serde(default)]
    insert5: String,
    #[serde(default)]
    insert3: String,
    #[serde(default)]
    preferences: DesignPreferences,
}

#[derive(Serialize)]
struct PlasmidSummary {
    name: Option<String>,
    length: usize,
    circular: bool,
    annotations: usize,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  clonedesign_cli --version\n  \
  clonedesign_cli design SEQUENCE_FILE '<design-json>'\n  \
  clonedesign_cli subclone VECTOR_FILE '<subclone-json>'\n  \
  clonedesign_cli reconcile SEQUENCE_FILE '<design-json>' OUTPUT.gb\n  \
  clonedesign_cli export-csv SEQUENCE_FILE '<design-json>'\n\n  \
  Design JSON: {{\"operation\": \"Insertion\", \"start\": 100, \"end\": 120, \"insert\": \"ATG\"}}\n  \
  Subclone JSON: {{\"start\": 100, \"end\": 120, \"target\": \"...\", \"insert5\": \"\", \"insert3\": \"\"}}\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn load_plasmid(path: &str) -> Result<Plasmid, String> {
    let lower = path.to_lowercase();
    let plasmids = if lower.ends_with(".gb") || lower.ends_with(".gbk") || lower.ends_with(".genbank")
    {
        Plasmid::from_genbank_file(path)
    } else {
        Plasmid::from_fasta_file(path)
    }
    .map_err(|e| format!("Could not read sequence file '{path}': {e}"))?;
    plasmids
        .into_iter()
        .next()
        .ok_or_else(|| format!("No sequence records in '{path}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn design_from_args(args: &[String], cmd_idx: usize) -> Result<PrimerSet, String> {
    if args.len() <= cmd_idx + 2 {
        usage();
        return Err("design requires: SEQUENCE_FILE '<design-json>'".to_string());
    }
    let plasmid = load_plasmid(&args[cmd_idx + 1])?;
    let json = load_json_arg(&args[cmd_idx + 2])?;
    let request: DesignRequest =
        serde_json::from_str(&json).map_err(|e| format!("Invalid design JSON: {e}"))?;
    generate_primer_set(
        request.operation,
        request.edit_span(),
        &plasmid,
        &request.insert,
        &request.preferences,
    )
    .map_err(|e| e.to_string())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("clonedesign {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cmd_idx = 1;
    let command = &args[cmd_idx];

    match command.as_str() {
        "design" => {
            let set = design_from_args(&args, cmd_idx)?;
            print_json(&set)
        }
        "export-csv" => {
            let set = design_from_args(&args, cmd_idx)?;
            let csv = primer_export::export_csv(&[set]).map_err(|e| e.to_string())?;
            print!("{csv}");
            Ok(())
        }
        "reconcile" => {
            if args.len() <= cmd_idx + 3 {
                usage();
                return Err(
                    "reconcile requires: SEQUENCE_FILE '<design-json>' OUTPUT.gb".to_string()
                );
            }
            let plasmid = load_plasmid(&args[cmd_idx + 1])?;
            let json = load_json_arg(&args[cmd_idx + 2])?;
            let output = &args[cmd_idx + 3];
            let request: DesignRequest =
                serde_json::from_str(&json).map_err(|e| format!("Invalid design JSON: {e}"))?;
            let edited = reconcile(
                request.operation,
                request.edit_span(),
                &request.insert,
                &plasmid,
            )
            .map_err(|e| e.to_string())?;
            edited
                .write_genbank_file(output)
                .map_err(|e| format!("Could not write '{output}': {e}"))?;
            print_json(&PlasmidSummary {
                name: edited.name().clone(),
                length: edited.len(),
                circular: edited.is_circular(),
                annotations: edited.annotations().len(),
            })
        }
        "subclone" => {
            if args.len() <= cmd_idx + 2 {
                usage();
                return Err("subclone requires: VECTOR_FILE '<subclone-json>'".to_string());
            }
            let vector = load_plasmid(&args[cmd_idx + 1])?;
            let json = load_json_arg(&args[cmd_idx + 2])?;
            let request: SubcloneRequest =
                serde_json::from_str(&json).map_err(|e| format!("Invalid subclone JSON: {e}"))?;
            let edit_span = match request.end {
                Some(end) => EditSpan::replacement(request.start, end),
                None => EditSpan::insertion_before(request.start),
            };
            let set = generate_subcloning_set(
                edit_span,
                &vector,
                &request.target,
                &request.insert5,
                &request.insert3,
                &request.preferences,
            )
            .map_err(|e| e.to_string())?;
            print_json(&set)
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}
