// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

// Headless walkthrough over a seeded in-memory directory. Exercises the same
// workspace and table code a frontend would.

use crate::config::Config;
use anyhow::Result;
use cartable_app::validation::format_score;
use cartable_app::{Role, Section, Session};
use cartable_testkit::InMemoryDirectory;
use cartable_views::{DataSource, SectionTable, Workspace, columns};

pub fn run(config: &Config, role: Role, seed: u64) -> Result<()> {
    let mut directory = InMemoryDirectory::seeded(seed);
    let session = demo_session(config, role, &directory);

    println!("cartable demo (seed {seed}, role {})", role.as_str());
    println!();

    if config.show_dashboard() {
        print_dashboard(&mut directory, &session)?;
    }

    let mut workspace = Workspace::sized(role, config.page_size());
    for &section in role.sections() {
        if matches!(section, Section::Dashboard | Section::Settings) {
            continue;
        }
        workspace.activate(&mut directory, &session, section)?;
        let Some(table) = workspace.table() else {
            continue;
        };
        println!("== {} ({} records) ==", section.label(), table.record_count());
        print_page(table);
        println!();
    }

    scripted_search(&mut workspace, &mut directory, &session)?;
    Ok(())
}

// Parent sessions are scoped to the first two seeded students so the
// walkthrough shows the narrowed views a guardian would see.
fn demo_session(config: &Config, role: Role, directory: &InMemoryDirectory) -> Session {
    let token = if config.token().is_empty() {
        "demo-token"
    } else {
        config.token()
    };
    let display_name = if config.display_name().is_empty() {
        "Demo User"
    } else {
        config.display_name()
    };
    let session = Session::new(token, role, display_name);
    if role == Role::Parent {
        let student_ids = directory
            .dataset()
            .students
            .iter()
            .filter(|student| student.archived_at.is_none())
            .take(2)
            .map(|student| student.id)
            .collect();
        session.with_students(student_ids)
    } else {
        session
    }
}

fn print_dashboard(directory: &mut InMemoryDirectory, session: &Session) -> Result<()> {
    let counts = directory.load_counts(session)?;
    println!(
        "dashboard: {} students, {} teachers, {} classes, {} grades this term",
        counts.students, counts.teachers, counts.classes, counts.graded_this_term
    );

    let snapshot = directory.load_dashboard(session)?;
    for grade in &snapshot.recent_grades {
        println!(
            "  recent: {} scored {}/{} in {} on {}",
            grade.student_name,
            format_score(grade.score),
            format_score(grade.out_of),
            grade.subject_name,
            grade.graded_on,
        );
    }
    for standing in &snapshot.class_standings {
        println!(
            "  class {}: {}/{} enrolled",
            standing.class_name, standing.enrolled, standing.capacity
        );
    }
    for contact in &snapshot.missing_guardian_email {
        println!(
            "  missing guardian e-mail: {} ({})",
            contact.student_name, contact.class_name
        );
    }
    println!();
    Ok(())
}

fn print_page(table: &SectionTable) {
    let specs = columns(table.section());
    let view = table.view();

    let mut widths: Vec<usize> = specs.iter().map(|spec| spec.label.len()).collect();
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|record| {
            specs
                .iter()
                .enumerate()
                .map(|(index, spec)| {
                    let text = cartable_views::cell_text(record, spec.field);
                    widths[index] = widths[index].max(text.len());
                    text
                })
                .collect()
        })
        .collect();

    let header: Vec<String> = specs
        .iter()
        .zip(widths.iter().copied())
        .map(|(spec, width)| format!("{:width$}", spec.label))
        .collect();
    println!("  {}", header.join("  "));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(text, width)| format!("{text:width$}"))
            .collect();
        println!("  {}", cells.join("  "));
    }
    println!(
        "  page {}/{} ({} matching)",
        view.page, view.total_pages, view.total_records
    );
}

// A fixed search over the first table-bearing section, showing how a
// narrowed query lands back on page one.
fn scripted_search(
    workspace: &mut Workspace,
    directory: &mut InMemoryDirectory,
    session: &Session,
) -> Result<()> {
    let section = workspace
        .state
        .role
        .sections()
        .iter()
        .copied()
        .find(|section| !matches!(section, Section::Dashboard | Section::Settings));
    let Some(section) = section else {
        return Ok(());
    };

    workspace.activate(directory, session, section)?;
    let Some(table) = workspace.table_mut() else {
        return Ok(());
    };
    let status = table.search("an");
    println!("== search \"an\" in {} ==", section.label());
    println!("  {}", status.message());
    print_page(table);
    Ok(())
}
