use autotitle::{
    rename_targets, CancelToken, ChannelSink, Episode, Event, Media, OutputSpec, PatternRule,
    RenameJob, RenameOptions, RenameResult, RenameStatus, Renamer, Target,
};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::tempdir;

fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name).unwrap();
    }
}

fn renames(result: &RenameResult) -> HashMap<String, String> {
    result
        .operations
        .iter()
        .map(|op| (op.source_name.clone(), op.target_name.clone()))
        .collect()
}

fn dry_run(target: &Target, media: &Media) -> RenameResult {
    Renamer::new(RenameOptions::default())
        .with_dry_run()
        .execute(target, media)
        .unwrap()
}

#[test]
fn test_season_offset_with_glued_prefix() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["[Sub] My Anime - 01.mkv", "My Anime E02.mp4"]);

    let media = Media::new(
        "My Anime",
        (1..=24).map(|n| {
            let title = match n {
                13 => "The Beginning of Season 2",
                14 => "The Continuation",
                _ => "Generic Episode Title",
            };
            Episode::new(n, title, false)
        }),
    );

    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["[Sub] My Anime - {{EP_NUM}}.{{EXT}}", "My Anime E{{EP_NUM}}.{{EXT}}"],
            OutputSpec::new(["S2", "+", "EP_NUM", " - ", "EP_NAME"], "").with_offset(12),
        )],
    );

    let options = RenameOptions {
        formats: vec!["mkv".to_string(), "mp4".to_string()],
        ..Default::default()
    };
    let result = Renamer::new(options).execute(&target, &media).unwrap();

    assert_eq!(result.len(), 2);
    let renames = renames(&result);
    assert_eq!(
        renames["[Sub] My Anime - 01.mkv"],
        "S213 - The Beginning of Season 2.mkv"
    );
    assert_eq!(renames["My Anime E02.mp4"], "S214 - The Continuation.mp4");
    assert!(dir.path().join("S213 - The Beginning of Season 2.mkv").exists());
    assert!(dir.path().join("S214 - The Continuation.mp4").exists());
}

#[test]
fn test_filler_marker_without_doubled_separator() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["Series - 05.mkv", "Series - 06.mkv"]);

    let media = Media::new(
        "Naruto",
        vec![
            Episode::new(5, "Filler Arc Start", true),
            Episode::new(6, "Canon Arc Start", false),
        ],
    );
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["{{SERIES}} - {{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM", "FILLER", "EP_NAME"], " - "),
        )],
    );

    let renames = renames(&dry_run(&target, &media));
    assert_eq!(
        renames["Series - 05.mkv"],
        "Naruto - 05 - [F] - Filler Arc Start.mkv"
    );
    assert_eq!(renames["Series - 06.mkv"], "Naruto - 06 - Canon Arc Start.mkv");
}

#[test]
fn test_double_space_separator() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["Test Series - 01.mkv"]);

    let media = Media::new("Test Series", vec![Episode::new(1, "Episode 1", false)]);
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["{{SERIES}} - {{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM", "EP_NAME"], "  "),
        )],
    );

    let result = dry_run(&target, &media);
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.operations[0].target_name,
        "Test Series  01  Episode 1.mkv"
    );
}

#[test]
fn test_offset_out_of_range_produces_nothing() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["Series - 01.mkv"]);

    let media = Media::new("Mini Series", vec![Episode::new(1, "Ep 1", false)]);
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["{{SERIES}} - {{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM"], "").with_offset(100),
        )],
    );

    let result = Renamer::new(RenameOptions::default())
        .execute(&target, &media)
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.skipped_files, 1);
    assert!(dir.path().join("Series - 01.mkv").exists());
}

#[test]
fn test_strict_pattern_ignores_other_files() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["Series - 01.mkv", "readme.txt", "Unknown - 99.avi"]);

    let media = Media::new("Series", vec![Episode::new(1, "Ep 1", false)]);
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["Series - {{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM"], ""),
        )],
    );

    let result = dry_run(&target, &media);
    assert_eq!(result.len(), 1);
    assert_eq!(result.operations[0].source_name, "Series - 01.mkv");
}

#[test]
fn test_targets_are_collision_free() {
    let dir = tempdir().unwrap();
    touch(
        dir.path(),
        &[
            "[A] Show - 01.mkv",
            "[B] Show - 01.mkv",
            "[C] Show - 01.mkv",
            "Show - 01.mkv",
        ],
    );

    let media = Media::new("Show", vec![Episode::new(1, "", false)]);
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["[{{ANY}}] Show - {{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM"], " - "),
        )],
    );

    let result = Renamer::new(RenameOptions::default())
        .execute(&target, &media)
        .unwrap();

    assert_eq!(result.count(RenameStatus::Success), 3);

    let targets: HashSet<_> = result.operations.iter().map(|op| &op.target_path).collect();
    assert_eq!(targets.len(), 3);

    // The pre-existing file keeps its content
    assert_eq!(
        fs::read_to_string(dir.path().join("Show - 01.mkv")).unwrap(),
        "Show - 01.mkv"
    );
    for n in 1..=3 {
        assert!(dir.path().join(format!("Show - 01 ({}).mkv", n)).exists());
    }
}

#[test]
fn test_channel_sink_streams_events_to_consumer() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["ep01.mkv", "ep02.mkv", "ep03.mkv"]);

    let media = Media::new("Show", (1..=3).map(|n| Episode::new(n, "Title", false)));
    let target = Target::new(
        dir.path(),
        vec![PatternRule::new(
            ["ep{{EP_NUM}}"],
            OutputSpec::new(["SERIES", "EP_NUM"], " "),
        )],
    );

    let cancel = CancelToken::new();
    let (sink, events) = ChannelSink::new(1, cancel.clone());
    let consumer = thread::spawn(move || events.iter().map(|e| e.message).collect::<Vec<_>>());

    let renamer = Renamer::new(RenameOptions::default())
        .with_events(sink)
        .with_cancel(cancel);
    let result = renamer.execute(&target, &media).unwrap();
    drop(renamer);

    let messages = consumer.join().unwrap();
    assert_eq!(result.count(RenameStatus::Success), 3);
    assert_eq!(
        messages,
        vec![
            "Matched: ep01.mkv",
            "Renamed: ep01.mkv → Show 01.mkv",
            "Matched: ep02.mkv",
            "Renamed: ep02.mkv → Show 02.mkv",
            "Matched: ep03.mkv",
            "Renamed: ep03.mkv → Show 03.mkv",
        ]
    );
}

#[test]
fn test_multiple_targets_share_one_renamer() {
    let roots: Vec<_> = (0..3).map(|_| tempdir().unwrap()).collect();
    for root in &roots {
        touch(root.path(), &["Show - 01.mkv", "Show - 02.mkv"]);
    }

    let media = Media::new("Show", (1..=2).map(|n| Episode::new(n, format!("Part {}", n), false)));
    let jobs: Vec<RenameJob> = roots
        .iter()
        .map(|root| {
            let target = Target::new(
                root.path(),
                vec![PatternRule::new(
                    ["{{SERIES}} - {{EP_NUM}}"],
                    OutputSpec::new(["EP_NUM", "EP_NAME"], ". "),
                )],
            );
            RenameJob::new(target, media.clone())
        })
        .collect();

    let seen: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let renamer = Renamer::new(RenameOptions::default())
        .with_events(move |e: Event| sink_seen.lock().unwrap().push(e));

    let results = rename_targets(&renamer, &jobs, 2).unwrap();

    for (root, result) in roots.iter().zip(results) {
        let result = result.unwrap();
        assert_eq!(result.count(RenameStatus::Success), 2);
        assert!(root.path().join("01. Part 1.mkv").exists());
        assert!(root.path().join("02. Part 2.mkv").exists());
    }

    // Per target, events stay in file order
    let seen = seen.lock().unwrap();
    for root in &roots {
        let messages: Vec<&str> = seen
            .iter()
            .filter(|e| e.source.as_deref().map_or(false, |s| s.starts_with(root.path())))
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Matched: Show - 01.mkv",
                "Renamed: Show - 01.mkv → 01. Part 1.mkv",
                "Matched: Show - 02.mkv",
                "Renamed: Show - 02.mkv → 02. Part 2.mkv",
            ]
        );
    }
}
