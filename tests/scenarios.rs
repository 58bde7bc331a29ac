//! End-to-end scenarios for the breaking pipeline


use chimbreak::chimera::{
    avoid_features, cluster_contig_alignments, find_intrachromosomal_break,
    significant_references, IntraThresholds,
};
use chimbreak::{Borders, BreakKind, BreakerConfig, ChimeraBreaker, ChimeraError, Interval};
use test_case::test_case;
use test_helpers::*;

fn small_config() -> BreakerConfig {
    BreakerConfig::default()
        .with_min_alignment_len(1_000)
        .with_significance(10.0, 1_000)
        .with_intra_gaps(1_000_000, 1_000_000)
}

#[test]
fn equal_halves_on_two_chromosomes_split_in_the_middle() {
    let set = alignment_set(
        "ctg",
        200,
        vec![aln("chr1", (0, 100), (0, 100)), aln("chr2", (0, 100), (100, 200))],
    );

    let significant = significant_references(&set, 0, 10.0, 10).unwrap();
    let names: Vec<&str> = significant.iter().map(|r| r.as_ref()).collect();
    assert_eq!(names, vec!["chr1", "chr2"]);

    let borders = cluster_contig_alignments(&set.with_references(&significant));
    assert_eq!(
        borders.as_slice(),
        &[Interval::new(0, 100), Interval::new(100, 200)]
    );
}

// chr1 covers 1000 bases, chr2 covers 60 (about 5.7% of the total)
#[test_case(5.0, 100 => false; "percentage alone is not enough")]
#[test_case(10.0, 10 => false; "absolute length alone is not enough")]
#[test_case(5.0, 10 => true; "both thresholds met")]
#[test_case(5.0, 60 => false; "absolute threshold is strict")]
fn minor_chromosome_needs_both_thresholds(percent: f64, bases: u64) -> bool {
    let set = alignment_set(
        "ctg",
        2_000,
        vec![
            aln("chr1", (0, 600), (0, 600)),
            aln("chr1", (400, 1_000), (600, 1_200)),
            aln("chr2", (0, 60), (1_200, 1_260)),
        ],
    );
    let significant = significant_references(&set, 0, percent, bases).unwrap();
    significant.iter().any(|r| r.as_ref() == "chr2")
}

#[test_case(false; "forward strand")]
#[test_case(true; "reverse strand")]
fn reference_jump_splits_at_lower_query_coordinate(reverse: bool) {
    let make = if reverse { aln_rev } else { aln };
    let set = alignment_set(
        "ctg",
        1_000,
        vec![
            make("chr1", (0, 10), (500, 510)),
            make("chr1", (5_000, 5_010), (510, 520)),
        ],
    );
    let thresholds = IntraThresholds {
        min_len: 5,
        max_ref_gap: 1_000,
        max_query_gap: 1_000,
    };

    let borders = find_intrachromosomal_break(&set, &thresholds).unwrap();
    assert_eq!(borders.breakpoints(), vec![500]);
}

// reference order puts (200, 300) first; on the reverse strand its query end leads
#[test_case(false => vec![200]; "forward strand cuts at query start")]
#[test_case(true => vec![300]; "reverse strand cuts at query end")]
fn contig_jump_splits_at_first_alignment_in_reference_order(reverse: bool) -> Vec<u32> {
    let make = if reverse { aln_rev } else { aln };
    let set = alignment_set(
        "ctg",
        5_000,
        vec![
            make("chr1", (100, 200), (3_000, 3_100)),
            make("chr1", (0, 100), (200, 300)),
        ],
    );
    let thresholds = IntraThresholds {
        min_len: 5,
        max_ref_gap: 1_000,
        max_query_gap: 1_000,
    };

    find_intrachromosomal_break(&set, &thresholds)
        .unwrap()
        .breakpoints()
}

#[test]
fn boundary_inside_feature_moves_past_it() {
    let borders = Borders::from_breakpoints(200, [100]);
    let adjusted = avoid_features("ctg", &borders, &[gene("ctg", 95, 105, "g")]).unwrap();
    assert_eq!(adjusted.breakpoints(), vec![105]);
}

#[test]
fn interchromosomal_chimera_is_broken_around_genes() {
    let set = two_chromosome_contig("tig1", 5_000);
    let original = sequence(10_000, 7);
    let mut contigs = contig_store(&[("tig1", original.clone()), ("tig2", sequence(300, 9))]);
    let mut features = feature_store(vec![
        gene("tig1", 100, 400, "g1"),
        gene("tig1", 4_900, 5_200, "g2"),
        gene("tig1", 6_000, 6_500, "g3"),
        gene("tig2", 10, 20, "g4"),
    ]);

    let breaker = ChimeraBreaker::new(small_config()).unwrap();
    let reports = breaker
        .process_all(&[set], &mut contigs, &mut features)
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, BreakKind::Interchromosomal);
    assert_eq!(reports[0].borders.breakpoints(), vec![5_200]);

    let names: Vec<&str> = contigs.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "tig1_chimera_broken:0-5200",
            "tig1_chimera_broken:5200-10000",
            "tig2"
        ]
    );
    let rejoined: Vec<u8> = contigs
        .values()
        .take(2)
        .flat_map(|s| s.iter().copied())
        .collect();
    assert_eq!(rejoined, original);

    let first = &features["tig1_chimera_broken:0-5200"];
    assert_eq!(first.len(), 2);
    assert_eq!((first[1].start, first[1].end), (4_900, 5_200));
    let second = &features["tig1_chimera_broken:5200-10000"];
    assert_eq!(second[0].seqname, "tig1_chimera_broken:5200-10000");
    assert_eq!((second[0].start, second[0].end), (800, 1_300));
    assert_eq!(second[0].payload[5], "ID=g3");
    assert!(!features.contains_key("tig1"));
    assert_eq!(features["tig2"].len(), 1);
}

#[test]
fn intrachromosomal_chimera_is_broken_when_enabled() {
    let set = alignment_set(
        "tig",
        6_000,
        vec![
            aln("chr1", (0, 2_000), (0, 2_000)),
            aln("chr1", (2_000, 3_000), (2_000, 3_000)),
            aln("chr1", (9_000_000, 9_003_000), (3_000, 6_000)),
        ],
    );
    let mut contigs = contig_store(&[("tig", sequence(6_000, 3))]);
    let mut features = feature_store(Vec::new());

    let breaker = ChimeraBreaker::new(small_config()).unwrap();
    let reports = breaker
        .process_all(std::slice::from_ref(&set), &mut contigs, &mut features)
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, BreakKind::Intrachromosomal);
    assert_eq!(reports[0].borders.breakpoints(), vec![2_000]);
    assert_eq!(contigs.len(), 2);

    let disabled = ChimeraBreaker::new(small_config().with_intrachromosomal(false)).unwrap();
    assert!(disabled.plan_contig(&set, &[]).unwrap().is_none());
}

#[test]
fn ignored_contig_is_left_alone() {
    let set = two_chromosome_contig("tig1", 5_000);
    let mut contigs = contig_store(&[("tig1", sequence(10_000, 1))]);
    let mut features = feature_store(Vec::new());

    let breaker = ChimeraBreaker::new(small_config().with_ignored(["tig1"])).unwrap();
    let reports = breaker
        .process_all(&[set], &mut contigs, &mut features)
        .unwrap();
    assert!(reports.is_empty());
    assert!(contigs.contains_key("tig1"));
}

#[test]
fn short_alignments_only_leave_contig_whole() {
    let set = alignment_set(
        "tig",
        400,
        vec![aln("chr1", (0, 200), (0, 200)), aln("chr2", (0, 200), (200, 400))],
    );
    let breaker = ChimeraBreaker::new(small_config()).unwrap();
    assert!(breaker.plan_contig(&set, &[]).unwrap().is_none());
    assert!(matches!(
        significant_references(&set, 1_000, 10.0, 1_000),
        Err(ChimeraError::InsufficientCoverage { .. })
    ));
}

#[test]
fn missing_sequence_aborts_without_edits() {
    let set = two_chromosome_contig("tig1", 5_000);
    let mut contigs = contig_store(&[("other", sequence(100, 1))]);
    let mut features = feature_store(Vec::new());

    let breaker = ChimeraBreaker::new(small_config()).unwrap();
    let err = breaker
        .process_all(&[set], &mut contigs, &mut features)
        .unwrap_err();
    assert!(err.to_string().contains("no sequence found for contig tig1"));
    assert_eq!(contigs.len(), 1);
}

#[test]
fn sequence_length_mismatch_is_fatal_and_atomic() {
    let set = two_chromosome_contig("tig1", 5_000);
    let mut contigs = contig_store(&[("tig1", sequence(9_000, 1))]);
    let mut features = feature_store(vec![gene("tig1", 10, 20, "g")]);

    let breaker = ChimeraBreaker::new(small_config()).unwrap();
    let err = breaker
        .process_all(&[set], &mut contigs, &mut features)
        .unwrap_err();
    assert!(err.to_string().contains("split invariant violated"));
    assert!(contigs.contains_key("tig1"));
    assert!(features.contains_key("tig1"));
}
