use clap::ValueEnum;
use labeler_text::StemmerKind;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum StemmerFlag {
    None,
    Plural,
    Porter,
}

impl StemmerFlag {
    pub(crate) const fn as_domain(self) -> StemmerKind {
        match self {
            StemmerFlag::None => StemmerKind::None,
            StemmerFlag::Plural => StemmerKind::Plural,
            StemmerFlag::Porter => StemmerKind::Porter,
        }
    }
}
