//! Commit sources: JSON-lines files and git repositories.

use crate::types::Commit;
use chrono::{DateTime, Utc};
use eyre::{Context, Result, bail};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;

/// Field separator in the `git log` format.
const FIELD_SEP: char = '\x1f';

/// `git log` format: hash, parents, author, ISO date, subject.
const GIT_FORMAT: &str = "--format=%H%x1f%P%x1f%an%x1f%aI%x1f%s";

/// Read one commit per line.
///
/// Blank lines are skipped, malformed or invalid lines are logged and
/// skipped, and a later line with the same id replaces the earlier one.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<Commit>> {
    let mut commits: Vec<Commit> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut line_count = 0;

    for line in reader.lines() {
        line_count += 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_count))?;

        if line.trim().is_empty() {
            continue;
        }

        let commit = match serde_json::from_str::<Commit>(&line) {
            Ok(commit) => commit,
            Err(e) => {
                log::warn!("Skipping malformed line {}: {}", line_count, e);
                continue;
            }
        };
        if let Err(e) = commit.validate() {
            log::warn!("Skipping invalid commit on line {}: {}", line_count, e);
            continue;
        }

        match positions.get(&commit.id) {
            Some(&pos) => commits[pos] = commit,
            None => {
                positions.insert(commit.id.clone(), commits.len());
                commits.push(commit);
            }
        }
    }

    log::info!("Read {} commits from {} lines", commits.len(), line_count);
    Ok(commits)
}

/// Read a JSON-lines commit file.
pub fn load_jsonl(path: &Path) -> Result<Vec<Commit>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_jsonl(BufReader::new(file))
}

/// Drop parent ids that name commits not in `commits`.
///
/// Returns how many references were removed.
pub fn prune_missing_parents(commits: &mut [Commit]) -> usize {
    let known: HashSet<String> = commits.iter().map(|c| c.id.clone()).collect();
    let mut pruned = 0;

    for commit in commits.iter_mut() {
        let before = commit.parents.len();
        commit.parents.retain(|p| known.contains(p));
        pruned += before - commit.parents.len();
    }

    if pruned > 0 {
        log::debug!("Pruned {} parent references outside the commit set", pruned);
    }
    pruned
}

/// Commits and heads read from a git repository.
#[derive(Debug, Clone)]
pub struct GitHistory {
    pub commits: Vec<Commit>,
    pub heads: Vec<String>,
}

/// Read the history reachable from `revs` (default `HEAD`) in `repo`.
pub fn git_log(repo: &Path, revs: &[String], max_count: Option<usize>) -> Result<GitHistory> {
    let revs: Vec<String> = if revs.is_empty() {
        vec!["HEAD".to_string()]
    } else {
        revs.to_vec()
    };

    let mut args = vec!["log".to_string(), "--topo-order".to_string(), GIT_FORMAT.to_string()];
    if let Some(n) = max_count {
        args.push(format!("--max-count={}", n));
    }
    args.extend(revs.iter().cloned());
    args.push("--".to_string());

    let log_output = run_git(repo, &args)?;
    let mut commits = parse_git_log(&log_output)?;
    prune_missing_parents(&mut commits);

    let mut rev_parse = vec!["rev-parse".to_string()];
    rev_parse.extend(revs.iter().cloned());
    let known: HashSet<&str> = commits.iter().map(|c| c.id.as_str()).collect();

    let mut heads = Vec::new();
    for line in run_git(repo, &rev_parse)?.lines() {
        let id = line.trim();
        if known.contains(id) && !heads.iter().any(|h| h == id) {
            heads.push(id.to_string());
        }
    }

    Ok(GitHistory { commits, heads })
}

fn run_git(repo: &Path, args: &[String]) -> Result<String> {
    log::debug!("Running git {:?} in {}", args, repo.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .context("Failed to run git")?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.first().map(String::as_str).unwrap_or(""),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    String::from_utf8(output.stdout).context("git output is not valid UTF-8")
}

/// Parse output produced with [`GIT_FORMAT`].
pub fn parse_git_log(text: &str) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();

    for (n, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEP).collect();
        if fields.len() < 5 {
            bail!("Unexpected git log line {}: {:?}", n + 1, line);
        }

        let date = DateTime::parse_from_rfc3339(fields[3])
            .map(|d| d.with_timezone(&Utc))
            .ok();
        let author = Some(fields[2].to_string()).filter(|a| !a.is_empty());

        commits.push(Commit {
            id: fields[0].to_string(),
            parents: fields[1].split_whitespace().map(String::from).collect(),
            message: fields[4..].join("\u{1f}"),
            author,
            date,
        });
    }

    Ok(commits)
}
