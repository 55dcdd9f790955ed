//! Inspect command.

use anyhow::{Context, Result};
use apk_manifest_core::{
  BufferCandidates, CandidateSource, Manifest, ParseOptions, ZipCandidates, compute_digest,
  encode_digest, parse_first_candidate,
};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;
use std::time::Duration;

use crate::json::{DigestJson, EntryJson, InspectJson};
use crate::util::{format_bytes, format_span, looks_like_zip};

pub fn inspect(input: PathBuf, entry: String, chunks: bool, json: bool) -> Result<()> {
  eprintln!("{}", style("==> Inspecting manifest").cyan().bold());

  let spinner = ProgressBar::new_spinner();
  spinner.set_style(
    ProgressStyle::default_spinner()
      .template("{spinner:.cyan} {msg}")
      .context("Invalid progress template")?,
  );
  spinner.enable_steady_tick(Duration::from_millis(80));
  spinner.set_message(format!("Reading {}", style(input.display()).cyan()));

  let mut data = Vec::new();
  let mut file = BufReader::new(
    File::open(&input).with_context(|| format!("Failed to open input: {}", input.display()))?,
  );
  file.read_to_end(&mut data)?;

  spinner.finish_with_message(format!(
    "[OK] Read input ({})",
    style(format_bytes(data.len())).cyan()
  ));

  let options = ParseOptions {
    capture_chunks: chunks,
  };

  let mut source: Box<dyn CandidateSource> = if looks_like_zip(&data) {
    let zip = ZipCandidates::new(Cursor::new(data), &entry)
      .with_context(|| format!("Failed to read archive: {}", input.display()))?;
    eprintln!(
      "    Found {} candidate(s) for {}",
      style(zip.remaining()).cyan(),
      style(&entry).cyan()
    );
    Box::new(zip)
  } else {
    tracing::debug!("Input is not a zip archive, parsing it as a bare manifest");
    Box::new(BufferCandidates::single(
      input.display().to_string(),
      data,
    ))
  };

  let manifest = parse_first_candidate(source.as_mut(), options)
    .with_context(|| format!("No usable manifest in {}", input.display()))?;

  eprintln!(
    "      {} {} main attribute(s), {} entr{}",
    style("[OK]").green().bold(),
    manifest.main_attributes().len(),
    manifest.entries().len(),
    if manifest.entries().len() == 1 { "y" } else { "ies" }
  );

  if json {
    let payload = InspectJson {
      status: "ok",
      command: "inspect",
      input: input.display().to_string(),
      entry: source.name(),
      size: manifest.raw().len(),
      main_end: manifest.main_end(),
      main_attributes: manifest.main_attributes(),
      entries: entries_json(&manifest),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    return Ok(());
  }

  print_manifest(&manifest);
  Ok(())
}

fn entries_json(manifest: &Manifest) -> Vec<EntryJson<'_>> {
  manifest
    .entries()
    .iter()
    .map(|(name, attributes)| EntryJson {
      name,
      attributes,
      span: manifest.span(name),
      digests: manifest
        .entry_digests(name)
        .into_iter()
        .map(|(alg, declared)| DigestJson {
          algorithm: alg.attribute_prefix(),
          declared,
          computed: manifest
            .chunk(name)
            .map(|chunk| encode_digest(&compute_digest(alg, chunk))),
        })
        .collect(),
    })
    .collect()
}

fn print_manifest(manifest: &Manifest) {
  eprintln!(
    "\n    Main attributes ({}):",
    manifest.main_attributes().len()
  );
  for (key, value) in manifest.main_attributes() {
    eprintln!("      {}: {}", style(key).cyan(), value);
  }

  eprintln!("\n    Entries ({}):", manifest.entries().len());
  for (i, (name, attributes)) in manifest.entries().iter().enumerate() {
    eprintln!("      {}. {}", i + 1, style(name).cyan().bold());
    for (key, value) in attributes {
      eprintln!("         {}: {}", style(key).cyan(), value);
    }

    let Some(chunk) = manifest.chunk(name) else {
      continue;
    };
    if let Some(span) = manifest.span(name) {
      eprintln!("         Span: {}", style(format_span(span)).dim());
    }
    for (alg, _) in manifest.entry_digests(name) {
      eprintln!(
        "         Computed {}: {}",
        alg,
        style(encode_digest(&compute_digest(alg, chunk))).dim()
      );
    }
  }
}
