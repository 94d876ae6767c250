use anyhow::Result;
use ironstream::grouping::GroupingEngine;
use ironstream::job::Job;
use ironstream::testing::WireBuilder;
use pretty_assertions::assert_eq;
use std::io::{self, Cursor};

fn open_engine(input: String) -> Result<GroupingEngine<String, i64>> {
    let (engine, _ctx) = Job::<String, i64, String, i64>::new().open(Cursor::new(input.into_bytes()), io::sink())?;
    Ok(engine)
}

fn groups(engine: &mut GroupingEngine<String, i64>) -> Result<Vec<(String, Vec<i64>)>> {
    let mut out = Vec::new();
    while let Some((key, values)) = engine.next_group()? {
        out.push((key, values.collect()));
    }
    Ok(out)
}

#[test]
fn runs_of_equal_keys_form_groups() -> Result<()> {
    let input = WireBuilder::new()
        .group("A", [1, 2, 3])
        .group("B", [4, 5])
        .record("C", 6)
        .build();
    let mut engine = open_engine(input)?;
    let counts: Vec<(String, usize)> = groups(&mut engine)?
        .into_iter()
        .map(|(k, vs)| (k, vs.len()))
        .collect();
    assert_eq!(
        counts,
        vec![("A".to_string(), 3), ("B".to_string(), 2), ("C".to_string(), 1)]
    );
    assert_eq!(engine.groups(), 3);
    Ok(())
}

#[test]
fn boundary_record_starts_the_next_group() -> Result<()> {
    let input = WireBuilder::new().record("A", 1).record("B", 2).record("B", 3).build();
    let mut engine = open_engine(input)?;
    assert_eq!(
        groups(&mut engine)?,
        vec![("A".to_string(), vec![1]), ("B".to_string(), vec![2, 3])]
    );
    Ok(())
}

#[test]
fn advance_after_exhausted_group_lands_on_the_boundary_record() -> Result<()> {
    let mut engine = open_engine(WireBuilder::new().group("A", [1, 2]).record("B", 3).build())?;
    assert!(engine.advance()?);
    assert_eq!(engine.values().count(), 2);
    assert!(engine.advance()?);
    assert_eq!(engine.current_key().map(String::as_str), Some("B"));
    assert_eq!(engine.values().collect::<Vec<_>>(), vec![3]);
    assert!(!engine.advance()?);
    Ok(())
}

#[test]
fn reappearing_key_forms_a_new_group() -> Result<()> {
    let input = WireBuilder::new().record("A", 1).record("B", 2).record("A", 3).build();
    let mut engine = open_engine(input)?;
    let keys: Vec<String> = groups(&mut engine)?.into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["A", "B", "A"]);
    Ok(())
}

#[test]
fn undrained_values_are_skipped() -> Result<()> {
    let input = WireBuilder::new().group("A", [1, 2, 3]).group("B", [4, 5]).build();
    let mut engine = open_engine(input)?;
    let mut firsts = Vec::new();
    while let Some((key, mut values)) = engine.next_group()? {
        firsts.push((key, values.next()));
    }
    assert_eq!(
        firsts,
        vec![("A".to_string(), Some(1)), ("B".to_string(), Some(4))]
    );
    Ok(())
}

#[test]
fn untouched_group_is_skipped_entirely() -> Result<()> {
    let input = WireBuilder::new().group("A", [1, 2]).record("B", 3).build();
    let mut engine = open_engine(input)?;
    let (first, _) = engine.next_group()?.expect("first group");
    let (second, values) = engine.next_group()?.expect("second group");
    assert_eq!((first.as_str(), second.as_str()), ("A", "B"));
    assert_eq!(values.collect::<Vec<_>>(), vec![3]);
    assert!(engine.next_group()?.is_none());
    Ok(())
}

#[test]
fn values_iterator_is_fused() -> Result<()> {
    let mut engine = open_engine(WireBuilder::new().record("A", 1).record("B", 2).build())?;
    let (_, mut values) = engine.next_group()?.expect("group");
    assert_eq!(values.next(), Some(1));
    assert_eq!(values.next(), None);
    assert!(!values.has_next());
    assert_eq!(values.next(), None);
    Ok(())
}

#[test]
fn record_mode_ignores_grouping() -> Result<()> {
    let mut engine = open_engine(WireBuilder::new().group("A", [1, 2]).record("B", 3).build())?;
    let mut seen = Vec::new();
    while let Some(record) = engine.next_record()? {
        seen.push(record.into_parts());
    }
    assert_eq!(
        seen,
        vec![("A".to_string(), 1), ("A".to_string(), 2), ("B".to_string(), 3)]
    );
    Ok(())
}

#[test]
fn current_key_tracks_the_loaded_record() -> Result<()> {
    let mut engine = open_engine(WireBuilder::new().record("A", 1).build())?;
    assert_eq!(engine.current_key(), None);
    assert!(engine.advance()?);
    assert_eq!(engine.current_key().map(String::as_str), Some("A"));
    assert!(!engine.advance()?);
    assert_eq!(engine.current_key(), None);
    Ok(())
}

#[test]
fn empty_input_has_no_groups() -> Result<()> {
    let mut engine = open_engine(String::new())?;
    assert!(engine.next_group()?.is_none());
    assert!(engine.next_group()?.is_none());
    assert_eq!(engine.groups(), 0);
    Ok(())
}

#[test]
fn keyless_input_is_one_group() -> Result<()> {
    let (mut engine, _ctx) = Job::<(), i64, (), i64>::new()
        .keyless_input()
        .keyless_output()
        .open(Cursor::new(b"1\n2\n3\n".to_vec()), io::sink())?;
    let ((), values) = engine.next_group()?.expect("group");
    assert_eq!(values.sum::<i64>(), 6);
    assert!(engine.next_group()?.is_none());
    Ok(())
}
