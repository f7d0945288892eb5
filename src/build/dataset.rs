//! Composition tables per symbol family
//!
//! Every table is turned into [`CompositionRule`]s in source order. Source
//! order matters: builders place the `i`-th source with the `i`-th offset of
//! their family's algorithm.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::DatasetError;

/// Name of the glyph a rule produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Named(String),
    /// No glyph is built; the sources are only made to exist
    ParentOnly,
}

/// One source position of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Glyph(String),
    /// Filled in by the caller at composition time; never placed here
    Caller,
}

impl Slot {
    pub fn name(&self) -> Option<&str> {
        match self {
            Slot::Glyph(name) => Some(name),
            Slot::Caller => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRule {
    pub target: Target,
    pub sources: Vec<Slot>,
}

impl CompositionRule {
    pub fn named(target: &str, sources: &[&str]) -> Self {
        Self {
            target: Target::Named(target.to_string()),
            sources: sources.iter().map(|s| Slot::Glyph(s.to_string())).collect(),
        }
    }

    pub fn parent_only(sources: &[&str]) -> Self {
        Self {
            target: Target::ParentOnly,
            sources: sources.iter().map(|s| Slot::Glyph(s.to_string())).collect(),
        }
    }

    /// `count` copies of a single source
    pub fn repeated(target: &str, source: &str, count: usize) -> Self {
        Self::named(target, &vec![source; count])
    }

    fn with_slots(target: &str, sources: &[Option<&str>]) -> Self {
        Self {
            target: Target::Named(target.to_string()),
            sources: sources
                .iter()
                .map(|s| match s {
                    Some(name) => Slot::Glyph(name.to_string()),
                    None => Slot::Caller,
                })
                .collect(),
        }
    }

    pub fn target_name(&self) -> Option<&str> {
        match &self.target {
            Target::Named(name) => Some(name),
            Target::ParentOnly => None,
        }
    }

    /// Name used in diagnostics
    pub fn label(&self) -> String {
        match &self.target {
            Target::Named(name) => name.clone(),
            Target::ParentOnly => self.glyph_sources().collect::<Vec<_>>().join(", "),
        }
    }

    pub fn glyph_sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().filter_map(Slot::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyph_sources().any(|source| source == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.glyph_sources().filter(|source| *source == name).count()
    }
}

fn named_rules(table: &[(&str, &[&str])]) -> Vec<CompositionRule> {
    table
        .iter()
        .map(|(target, sources)| CompositionRule::named(target, sources))
        .collect()
}

fn single_source_rules(table: &[(&str, &str)]) -> Vec<CompositionRule> {
    table
        .iter()
        .map(|(target, source)| CompositionRule::named(target, &[*source]))
        .collect()
}

/// Range descriptions by family key
pub const RANGES: &[(&str, &str)] = &[
    ("staves", "Staves (U+E010-U+E02F)"),
    ("barlines", "Barlines (U+E030-U+E03F)"),
    ("repeats", "Repeats (U+E040-U+E04F)"),
    ("time", "Time signatures (U+E080-U+E09F)"),
    ("indv notes", "Individual notes (U+E1D0-U+E1EF)"),
    ("beamed notes", "Beamed groups of notes (U+E1F0-U+E20F)"),
    ("stems", "Stems (U+E210-U+E21F)"),
    ("tremolos", "Tremolos (U+E220-U+E23F)"),
    ("flags", "Flags (U+E240-U+E25F)"),
    ("octaves", "Octaves (U+E510-U+E51F)"),
    ("dynamics", "Dynamics (U+E520-U+E54F)"),
    ("accordion", "Accordion (U+E8A0-U+E8DF)"),
    ("time sup", "Time signatures supplement (U+EC80-U+EC8F)"),
    ("octaves sup", "Octaves supplement (U+EC90-U+EC9F)"),
    ("turned time", "Turned time signatures (U+ECE0-U+ECEF)"),
    ("reversed time", "Reversed time signatures (U+ECF0-U+ECFF)"),
];

// Barlines and repeats

pub const THIN_BARLINE: &str = "uniE030";
pub const THICK_BARLINE: &str = "uniE034";
pub const REPEAT_DOT: &str = "uniE044";

pub fn barlines() -> Vec<CompositionRule> {
    let mut rules = named_rules(&[
        ("uniE031", &[THIN_BARLINE, THIN_BARLINE]),
        ("uniE032", &[THIN_BARLINE, THICK_BARLINE]),
        ("uniE033", &[THICK_BARLINE, THIN_BARLINE]),
        ("uniE035", &[THICK_BARLINE, THICK_BARLINE]),
    ]);
    rules.push(CompositionRule::parent_only(&[
        "uniE036", "uniE037", "uniE038", "uniE039",
    ]));
    rules
}

pub fn repeats() -> Vec<CompositionRule> {
    named_rules(&[
        ("uniE040", &[THICK_BARLINE, THIN_BARLINE, REPEAT_DOT, REPEAT_DOT]),
        ("uniE041", &[REPEAT_DOT, REPEAT_DOT, THIN_BARLINE, THICK_BARLINE]),
        (
            "uniE042",
            &[
                REPEAT_DOT,
                REPEAT_DOT,
                THIN_BARLINE,
                THICK_BARLINE,
                THIN_BARLINE,
                REPEAT_DOT,
                REPEAT_DOT,
            ],
        ),
        ("uniE043", &[REPEAT_DOT, REPEAT_DOT]),
    ])
}

pub fn repeats_alternates() -> Vec<CompositionRule> {
    named_rules(&[(
        "uniE042.salt01",
        &[REPEAT_DOT, REPEAT_DOT, THICK_BARLINE, THICK_BARLINE, REPEAT_DOT, REPEAT_DOT],
    )])
}

// Staves

/// Staff line parents and the 2- to 6-line staves built from them
const STAVES: &[(&str, [&str; 5])] = &[
    ("uniE010", ["uniE011", "uniE012", "uniE013", "uniE014", "uniE015"]),
    ("uniE016", ["uniE017", "uniE018", "uniE019", "uniE01A", "uniE01B"]),
    ("uniE01C", ["uniE01D", "uniE01E", "uniE01F", "uniE020", "uniE021"]),
];

pub fn staves() -> Vec<CompositionRule> {
    let mut rules = Vec::new();
    for (line, targets) in STAVES {
        for (i, target) in targets.iter().enumerate() {
            rules.push(CompositionRule::repeated(target, line, i + 2));
        }
    }
    rules.push(CompositionRule::parent_only(&["uniE022", "uniE023", "uniE024"]));
    rules
}

// Time signatures

pub const CUT_TIME_COMMON: &str = "uniE08B";
pub const NUMERATOR_CONTROL: &str = "uniE09E";
pub const DENOMINATOR_CONTROL: &str = "uniE09F";

pub fn time_fractions() -> Vec<CompositionRule> {
    named_rules(&[
        ("uniE097", &["uniE081", "uniE08E", "uniE084"]),
        ("uniE098", &["uniE081", "uniE08E", "uniE082"]),
        ("uniE099", &["uniE083", "uniE08E", "uniE084"]),
        ("uniE09A", &["uniE081", "uniE08E", "uniE083"]),
        ("uniE09B", &["uniE082", "uniE08E", "uniE083"]),
    ])
}

pub fn cut_time() -> Vec<CompositionRule> {
    single_source_rules(&[(CUT_TIME_COMMON, "uniE08A")])
}

pub fn cut_time_sup() -> Vec<CompositionRule> {
    single_source_rules(&[("uniEC85", "uniE082"), ("uniEC86", "uniE083")])
}

const TIME_DIGITS: [&str; 12] = [
    "uniE080", "uniE081", "uniE082", "uniE083", "uniE084", "uniE085", "uniE086", "uniE087",
    "uniE088", "uniE089", "uniE08A", "uniE08B",
];

fn mirrored_time(first: u32) -> Vec<CompositionRule> {
    TIME_DIGITS
        .iter()
        .zip(first..)
        .map(|(source, code)| CompositionRule::named(&format!("uni{code:04X}"), &[*source]))
        .collect()
}

pub fn turned_time() -> Vec<CompositionRule> {
    mirrored_time(0xECE0)
}

pub fn reversed_time() -> Vec<CompositionRule> {
    mirrored_time(0xECF0)
}

const TIME_LIGATURES: &[&str] = &[
    "uniE09F_uniE080",
    "uniE09E_uniE080",
    "uniE09F_uniE081",
    "uniE09E_uniE081",
    "uniE09F_uniE082",
    "uniE09E_uniE082",
    "uniE09F_uniE083",
    "uniE09E_uniE083",
    "uniE09F_uniE084",
    "uniE09E_uniE084",
    "uniE09F_uniE085",
    "uniE09E_uniE085",
    "uniE09F_uniE086",
    "uniE09E_uniE086",
    "uniE09F_uniE087",
    "uniE09E_uniE087",
    "uniE09F_uniE088",
    "uniE09E_uniE088",
    "uniE09F_uniE089",
    "uniE09E_uniE089",
    "uniE09E_uniE082_uniE09F_uniE084",
    "uniE09E_uniE082_uniE09F_uniE082",
    "uniE09E_uniE083_uniE09F_uniE082",
    "uniE09E_uniE083_uniE09F_uniE084",
    "uniE09E_uniE083_uniE09F_uniE088",
    "uniE09E_uniE084_uniE09F_uniE084",
    "uniE09E_uniE085_uniE09F_uniE084",
    "uniE09E_uniE085_uniE09F_uniE088",
    "uniE09E_uniE086_uniE09F_uniE084",
    "uniE09E_uniE086_uniE09F_uniE088",
    "uniE09E_uniE087_uniE09F_uniE088",
    "uniE09E_uniE089_uniE09F_uniE088",
    "uniE09E_uniE081_uniE09E_uniE082_uniE09F_uniE088",
];

/// Ligatures take their sources from their own names.
pub fn time_ligatures() -> Vec<CompositionRule> {
    TIME_LIGATURES
        .iter()
        .map(|name| {
            let tokens: Vec<&str> = name.split('_').collect();
            CompositionRule::named(name, &tokens)
        })
        .collect()
}

pub fn is_control_character(name: &str) -> bool {
    name == NUMERATOR_CONTROL || name == DENOMINATOR_CONTROL
}

// Notes

pub const STEM: &str = "uniE210";
pub const AUGMENTATION_DOT: &str = "uniE1E7";
pub const BEAM: &str = "uniE1F7";
pub const SHORT_BEAMED_STEM: &str = "uniE204";
pub const LONG_BEAMED_STEM: &str = "uniE205";
pub const TUPLET_BRACKET: &str = "uniE1FE";
pub const TUPLET_THREE: &str = "uniE883";
pub const RIM_SHOT: &str = "uniE263";

pub const NOTEHEADS: &[&str] = &["uniE0A0", "uniE0A1", "uniE0A2", "uniE0A3", "uniE0A4"];
/// Flags drawn below the notehead
pub const DOWN_FLAGS: &[&str] = &["uniE241", "uniE243", "uniE251"];

/// Individual notes with stems pointing down
pub const DOWN_STEM_NOTES: &[&str] = &[
    "uniE1D4", "uniE1D6", "uniE1D8", "uniE1DA", "uniE1DC", "uniE1DE", "uniE1E0", "uniE1E2",
    "uniE1E4", "uniE1E6",
];

pub fn stems() -> Vec<CompositionRule> {
    let symbols = [
        ("uniE211", "uniE645"),
        ("uniE212", "uniE808"),
        ("uniE213", "uniE22B"),
        ("uniE214", "uniE618"),
        ("uniE215", "uniE619"),
        ("uniE216", "uniE61A"),
        ("uniE217", "uniE22A"),
        ("uniE218", "uniE63B"),
        ("uniE219", "uniE623"),
        ("uniE21A", "uniE607"),
        ("uniE21B", "uniE608"),
        ("uniE21C", "uniE609"),
        ("uniE21D", "uniE646"),
        ("uniE21E", "uniE263"),
        ("uniE21F", "uniE694"),
    ];
    let mut rules = vec![CompositionRule::parent_only(&[STEM])];
    rules.extend(
        symbols
            .iter()
            .map(|(target, symbol)| CompositionRule::named(target, &[STEM, *symbol])),
    );
    rules
}

pub fn flags() -> Vec<CompositionRule> {
    let targets = [
        "uniE244", "uniE245", "uniE246", "uniE247", "uniE248", "uniE249", "uniE24A", "uniE24B",
        "uniE24C", "uniE24D", "uniE24E", "uniE24F",
    ];
    targets
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let internal_flags = i / 2 + 1;
            let (base, internal) = if i % 2 == 0 {
                ("uniE242", "uniE250")
            } else {
                ("uniE243", "uniE251")
            };
            let mut sources = vec![base];
            sources.extend(std::iter::repeat(internal).take(internal_flags));
            CompositionRule::named(target, &sources)
        })
        .collect()
}

pub fn indv_notes() -> Vec<CompositionRule> {
    let mut rules = named_rules(&[
        ("uniE1D0", &["uniE0A0"]),
        ("uniE1D1", &["uniE0A1"]),
        ("uniE1D2", &["uniE0A2"]),
        ("uniE1D3", &["uniE0A3", STEM]),
        ("uniE1D4", &["uniE0A3", STEM]),
        ("uniE1D5", &["uniE0A4", STEM]),
        ("uniE1D6", &["uniE0A4", STEM]),
        ("uniE1D7", &["uniE0A4", STEM, "uniE240"]),
        ("uniE1D8", &["uniE0A4", STEM, "uniE241"]),
        ("uniE1D9", &["uniE0A4", STEM, "uniE242"]),
        ("uniE1DA", &["uniE0A4", STEM, "uniE243"]),
    ]);
    let flagged = [
        "uniE1DB", "uniE1DC", "uniE1DD", "uniE1DE", "uniE1DF", "uniE1E0", "uniE1E1", "uniE1E2",
        "uniE1E3", "uniE1E4", "uniE1E5", "uniE1E6",
    ];
    for (i, target) in flagged.iter().enumerate() {
        let (base, internal) = if i % 2 == 0 {
            ("uniE242", "uniE250")
        } else {
            ("uniE243", "uniE251")
        };
        let mut sources = vec!["uniE0A4", STEM, base];
        sources.extend(std::iter::repeat(internal).take(i / 2 + 1));
        rules.push(CompositionRule::named(target, &sources));
    }
    rules.push(CompositionRule::parent_only(&[AUGMENTATION_DOT]));
    rules
}

pub fn indv_notes_alternates() -> Vec<CompositionRule> {
    named_rules(&[("uniE1D0.salt01", &["uniE0A0.salt01"])])
}

pub fn beamed_notes() -> Vec<CompositionRule> {
    const S: Option<&str> = Some(SHORT_BEAMED_STEM);
    const L: Option<&str> = Some(LONG_BEAMED_STEM);
    const N: Option<&str> = Some("uniE0A4");
    const B: Option<&str> = Some(BEAM);
    let table: &[(&str, &[Option<&str>])] = &[
        ("uniE1F0", &[S, N]),
        ("uniE1F1", &[L, N]),
        ("uniE1F2", &[S, N, B]),
        ("uniE1F3", &[L, N, B]),
        ("uniE1F4", &[S, N, B, B]),
        ("uniE1F5", &[L, N, B, B]),
        ("uniE1F6", &[L, N, B, B, B]),
        ("uniE1F8", &[None, None, B]),
        ("uniE1F9", &[None, None, B, B]),
        ("uniE1FA", &[None, None, B, B]),
        ("uniE1FB", &[None, None, B, B, B]),
        ("uniE1FC", &[None, None, Some(AUGMENTATION_DOT)]),
        ("uniE1FF", &[Some(TUPLET_THREE)]),
        ("uniE200", &[Some(TUPLET_BRACKET)]),
        ("uniE201", &[Some(TUPLET_BRACKET)]),
        ("uniE202", &[Some(TUPLET_THREE)]),
        ("uniE203", &[Some(TUPLET_BRACKET)]),
        ("uniE206", &[None, S, B]),
        ("uniE207", &[None, L, B]),
        ("uniE208", &[None, S, B, B]),
        ("uniE209", &[None, L, B, B]),
        ("uniE20A", &[None, L, B, B, B]),
    ];
    table
        .iter()
        .map(|(target, slots)| CompositionRule::with_slots(target, slots))
        .collect()
}

// Tremolos

pub const TREMOLO_SLASH: &str = "uniE220";
pub const FINGERED_TREMOLO_SLASH: &str = "uniE225";
pub const DIVISI_DOT: &str = "uniE4A2";

pub fn tremolos() -> Vec<CompositionRule> {
    let mut rules = Vec::new();
    for (parent, targets) in [
        (TREMOLO_SLASH, ["uniE221", "uniE222", "uniE223", "uniE224"]),
        (FINGERED_TREMOLO_SLASH, ["uniE226", "uniE227", "uniE228", "uniE229"]),
    ] {
        for (i, target) in targets.iter().enumerate() {
            rules.push(CompositionRule::repeated(target, parent, i + 2));
        }
    }
    for (target, dots) in [("uniE22E", 2), ("uniE22F", 3), ("uniE230", 4), ("uniE231", 6)] {
        rules.push(CompositionRule::repeated(target, DIVISI_DOT, dots));
    }
    rules
}

// Octaves

/// Unencoded letters, resolved through `[Octaves]`
pub const OCTAVE_LETTERS: &[(&str, &str)] = &[
    ("octaveC", "c"),
    ("octaveL", "l"),
    ("octaveO", "o"),
    ("octaveS", "s"),
];

pub const OCTAVE_EIGHT: &str = "uniE510";
pub const OCTAVE_BASELINE_A: &str = "uniEC91";
pub const SUPERSCRIPT_LETTERS: &[&str] = &["uniEC91", "uniEC93", "uniEC95", "uniEC97"];
/// Targets whose letters sit as superscripts
pub const SUPERSCRIPT_TARGETS: &[&str] = &[
    "uniE511", "uniE515", "uniE518", "uniEC92", "uniEC94", "uniEC96", "uniEC98",
];

pub fn octaves() -> Vec<CompositionRule> {
    named_rules(&[
        ("uniE511", &["uniE510", "uniEC97", "uniEC91"]),
        ("uniE512", &["uniE510", "uniEC97", "uniEC91"]),
        ("uniE513", &["uniE510", "uniEC93", "uniEC91"]),
        ("uniE515", &["uniE514", "uniEC95", "uniEC91"]),
        ("uniE516", &["uniE514", "uniEC95", "uniEC91"]),
        ("uniE518", &["uniE517", "uniEC95", "uniEC91"]),
        ("uniE519", &["uniE517", "uniEC95", "uniEC91"]),
        ("uniE51C", &["uniE510", "uniEC97", "uniEC93"]),
        ("uniE51D", &["uniE514", "uniEC95", "uniEC93"]),
        ("uniE51E", &["uniE517", "uniEC95", "uniEC93"]),
        ("uniE51F", &["uniEC93", "uniEC91", "octaveS", "octaveS", "uniEC91"]),
    ])
}

pub fn octaves_sup() -> Vec<CompositionRule> {
    named_rules(&[
        ("uniEC90", &["octaveL", "octaveO", "octaveC", "octaveO"]),
        ("uniEC92", &["uniEC91"]),
        ("uniEC94", &["uniEC93"]),
        ("uniEC96", &["uniEC95"]),
        ("uniEC98", &["uniEC97"]),
    ])
}

pub fn octaves_alternates() -> Vec<CompositionRule> {
    named_rules(&[
        ("uniE515.salt01", &["uniE514.salt01", "uniEC95", "uniEC91"]),
        ("uniE516.salt01", &["uniE514.salt01", "uniEC95", "uniEC91"]),
        ("uniE518.salt01", &["uniE517.salt01", "uniEC95", "uniEC91"]),
        ("uniE519.salt01", &["uniE517.salt01", "uniEC95", "uniEC91"]),
        ("uniE51D.salt01", &["uniE514.salt01", "uniEC95", "uniEC93"]),
        ("uniE51E.salt01", &["uniE517.salt01", "uniEC95", "uniEC93"]),
    ])
}

// Dynamics

pub const HAIRPIN: &str = "uniE53E";
pub const NIENTE: &str = "uniE541";
pub const DIMINUENDO: &str = "uniE53F";
/// Letters whose height sets the hairpin's vertical centre, in order of preference
pub const X_HEIGHT_LETTERS: &[&str] = &["uniE526", "uniE521", "uniE523", "uniE525", "uniE524"];

pub fn dynamics() -> Vec<CompositionRule> {
    let mut rules = vec![CompositionRule::parent_only(&[NIENTE])];
    let piano = "uniE520";
    let forte = "uniE522";
    for (target, count) in [
        ("uniE527", 6),
        ("uniE528", 5),
        ("uniE529", 4),
        ("uniE52A", 3),
        ("uniE52B", 2),
    ] {
        rules.push(CompositionRule::repeated(target, piano, count));
    }
    rules.extend(named_rules(&[
        ("uniE52C", &["uniE521", "uniE520"]),
        ("uniE52D", &["uniE521", "uniE522"]),
        ("uniE52E", &["uniE520", "uniE522"]),
    ]));
    for (target, count) in [
        ("uniE52F", 2),
        ("uniE530", 3),
        ("uniE531", 4),
        ("uniE532", 5),
        ("uniE533", 6),
    ] {
        rules.push(CompositionRule::repeated(target, forte, count));
    }
    rules.extend(named_rules(&[
        ("uniE534", &["uniE522", "uniE520"]),
        ("uniE535", &["uniE522", "uniE525"]),
        ("uniE536", &["uniE524", "uniE522"]),
        ("uniE537", &["uniE524", "uniE522", "uniE520"]),
        ("uniE538", &["uniE524", "uniE522", "uniE520", "uniE520"]),
        ("uniE539", &["uniE524", "uniE522", "uniE525"]),
        ("uniE53A", &["uniE524", "uniE522", "uniE525", "uniE520"]),
        ("uniE53B", &["uniE524", "uniE522", "uniE522", "uniE525"]),
        ("uniE53C", &["uniE523", "uniE522"]),
        ("uniE53D", &["uniE523", "uniE522", "uniE525"]),
        ("uniE53F", &[HAIRPIN]),
        ("uniE540", &[HAIRPIN, HAIRPIN]),
    ]));
    rules
}

// Accordion

pub const COUPLER_DOT: &str = "uniE8CA";
pub const SQUARE_RANKS: &str = "uniE8C9";

/// Rank frames and their number of partitions
pub const ACCORDION_RANKS: &[(&str, usize)] = &[
    ("uniE8C6", 3),
    ("uniE8C7", 4),
    ("uniE8C8", 2),
    ("uniE8C9", 3),
];

pub fn accordion_parents() -> Vec<CompositionRule> {
    let mut names: Vec<&str> = ACCORDION_RANKS.iter().map(|(name, _)| *name).collect();
    names.push(COUPLER_DOT);
    vec![CompositionRule::parent_only(&names)]
}

/// Named dot position on a rank frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Stop2,
    Stop4,
    Stop8,
    Upper8,
    Lower8,
    Stop16,
    Soprano,
    Alto,
    Tenor,
    Bass,
    Master,
    Stop8b,
    Stop16b,
    Stop8c,
    Double8Stop,
    Left8Stop,
    Right8Stop,
}

impl Placement {
    pub const ALL: [Placement; 17] = [
        Placement::Stop2,
        Placement::Stop4,
        Placement::Stop8,
        Placement::Upper8,
        Placement::Lower8,
        Placement::Stop16,
        Placement::Soprano,
        Placement::Alto,
        Placement::Tenor,
        Placement::Bass,
        Placement::Master,
        Placement::Stop8b,
        Placement::Stop16b,
        Placement::Stop8c,
        Placement::Double8Stop,
        Placement::Left8Stop,
        Placement::Right8Stop,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Placement::Stop2 => "stop2",
            Placement::Stop4 => "stop4",
            Placement::Stop8 => "stop8",
            Placement::Upper8 => "upper8",
            Placement::Lower8 => "lower8",
            Placement::Stop16 => "stop16",
            Placement::Soprano => "soprano",
            Placement::Alto => "alto",
            Placement::Tenor => "tenor",
            Placement::Bass => "bass",
            Placement::Master => "master",
            Placement::Stop8b => "stop8b",
            Placement::Stop16b => "stop16b",
            Placement::Stop8c => "stop8c",
            Placement::Double8Stop => "double8stop",
            Placement::Left8Stop => "left8stop",
            Placement::Right8Stop => "right8stop",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error for a token outside the closed set of placements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlacement(pub String);

impl FromStr for Placement {
    type Err = UnknownPlacement;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Placement::ALL
            .iter()
            .copied()
            .find(|placement| placement.token() == token)
            .ok_or_else(|| UnknownPlacement(token.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionRule {
    pub target: String,
    pub rank: String,
    pub placements: Vec<Placement>,
}

impl AccordionRule {
    pub fn parse(target: &str, rank: &str, tokens: &[&str]) -> Result<Self, DatasetError> {
        if tokens.is_empty() {
            return Err(DatasetError::EmptyRule(target.to_string()));
        }
        let placements = tokens
            .iter()
            .map(|token| {
                token.parse::<Placement>().map_err(|e| DatasetError::UnknownPlacement {
                    target: target.to_string(),
                    token: e.0,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            target: target.to_string(),
            rank: rank.to_string(),
            placements,
        })
    }
}

const ACCORDION_REGISTRATIONS: &[(&str, &str, &[&str])] = &[
    ("uniE8A0", "uniE8C6", &["stop4"]),
    ("uniE8A1", "uniE8C6", &["stop8"]),
    ("uniE8A2", "uniE8C6", &["upper8"]),
    ("uniE8A3", "uniE8C6", &["lower8"]),
    ("uniE8A4", "uniE8C6", &["stop16"]),
    ("uniE8A5", "uniE8C6", &["stop4", "stop8"]),
    ("uniE8A6", "uniE8C6", &["stop8", "upper8"]),
    ("uniE8A7", "uniE8C6", &["stop4", "stop8", "upper8"]),
    ("uniE8A8", "uniE8C6", &["lower8", "stop8", "upper8"]),
    ("uniE8A9", "uniE8C6", &["stop4", "stop16"]),
    ("uniE8AA", "uniE8C6", &["stop4", "stop8", "stop16"]),
    ("uniE8AB", "uniE8C6", &["stop8", "stop16"]),
    ("uniE8AC", "uniE8C6", &["stop8", "upper8", "stop16"]),
    ("uniE8AD", "uniE8C6", &["stop4", "lower8", "upper8", "stop16"]),
    ("uniE8AE", "uniE8C6", &["lower8", "upper8"]),
    ("uniE8AF", "uniE8C6", &["lower8", "upper8", "stop16"]),
    ("uniE8B0", "uniE8C6", &["stop4", "lower8", "upper8"]),
    ("uniE8B1", "uniE8C6", &["lower8", "stop8", "upper8", "stop16"]),
    ("uniE8B2", "uniE8C6", &["stop4", "lower8", "stop8", "upper8"]),
    ("uniE8B3", "uniE8C6", &["stop4", "lower8", "stop8", "upper8", "stop16"]),
    ("uniE8B4", "uniE8C7", &["soprano"]),
    ("uniE8B5", "uniE8C7", &["soprano", "alto"]),
    ("uniE8B6", "uniE8C7", &["soprano", "alto", "tenor"]),
    ("uniE8B7", "uniE8C7", &["soprano", "alto", "tenor", "bass", "master"]),
    ("uniE8B8", "uniE8C7", &["tenor", "bass", "master"]),
    ("uniE8B9", "uniE8C7", &["alto", "tenor"]),
    ("uniE8BA", "uniE8C7", &["soprano", "alto", "bass"]),
    ("uniE8BB", "uniE8C8", &["stop8b"]),
    ("uniE8BC", "uniE8C8", &["stop16b"]),
    ("uniE8BD", "uniE8C8", &["stop8b", "stop16b"]),
    ("uniE8BE", "uniE8C8", &["master"]),
    ("uniE8BF", "uniE8C8", &["stop16b", "master"]),
    ("uniE8C0", "uniE8C8", &["stop8b", "stop16b", "master"]),
    ("uniE8C1", "uniE8C9", &["stop8c"]),
    ("uniE8C2", "uniE8C9", &["stop2"]),
    ("uniE8C3", "uniE8C9", &["double8stop"]),
    ("uniE8C4", "uniE8C9", &["stop2", "stop8c"]),
    ("uniE8C5", "uniE8C9", &["stop2", "left8stop", "right8stop"]),
];

pub fn accordion_registrations() -> Result<Vec<AccordionRule>, DatasetError> {
    ACCORDION_REGISTRATIONS
        .iter()
        .map(|(target, rank, tokens)| AccordionRule::parse(target, rank, tokens))
        .collect()
}

/// Strip a `.suffix` from a glyph name.
pub fn base_name(name: &str) -> &str {
    name.split_once('.').map(|(base, _)| base).unwrap_or(name)
}

/// The `.suffix` of a glyph name, dot included.
pub fn name_suffix(name: &str) -> &str {
    name.find('.').map(|i| &name[i..]).unwrap_or("")
}
