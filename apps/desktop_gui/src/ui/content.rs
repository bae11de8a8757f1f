//! Static informational content rendered by the overview sections.

use analysis_client::AnalysisKind;

pub const HERO_TAGLINE: &str = "Harnessing AI to Protect Our";
pub const HERO_TAGLINE_EMPHASIS: &str = "Precious Coral Reefs";
pub const HERO_BODY: &str = "Using cutting-edge artificial intelligence to monitor, analyze, and \
protect coral reef ecosystems worldwide. Join our mission to preserve these vital marine \
habitats for future generations.";

pub const CORALS_INTRO: &str = "Coral reefs are among Earth's most diverse ecosystems, often \
called the \"rainforests of the sea.\" These living structures support 25% of all marine \
species while covering less than 1% of the ocean floor.";

pub const THREATS_INTRO: &str = "Coral reefs face unprecedented threats from climate change and \
human activities. Without immediate action, we could lose these irreplaceable ecosystems \
forever.";

pub const MAP_INTRO: &str = "Explore coral reef locations worldwide and monitor their \
conservation status through our interactive map.";

pub const ANALYSIS_INTRO: &str = "Use our advanced AI tools to monitor coral health and detect \
environmental threats";

pub struct CoralTypeCard {
    pub title: &'static str,
    pub description: &'static str,
    pub glyph: &'static str,
}

pub const CORAL_TYPES: [CoralTypeCard; 3] = [
    CoralTypeCard {
        title: "Hard Corals",
        description: "Build calcium carbonate structures that form reef foundations",
        glyph: "\u{1f6e1}",
    },
    CoralTypeCard {
        title: "Soft Corals",
        description: "Flexible corals that sway with currents, adding beauty and habitat",
        glyph: "\u{2764}",
    },
    CoralTypeCard {
        title: "Table Corals",
        description: "Flat, table-like structures providing shelter for marine life",
        glyph: "\u{1f41f}",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatImpact {
    High,
    Medium,
}

impl ThreatImpact {
    pub fn label(self) -> &'static str {
        match self {
            ThreatImpact::High => "High Impact",
            ThreatImpact::Medium => "Medium Impact",
        }
    }
}

pub struct ThreatCard {
    pub title: &'static str,
    pub description: &'static str,
    pub impact: ThreatImpact,
}

pub const THREATS: [ThreatCard; 3] = [
    ThreatCard {
        title: "Ocean Warming",
        description: "Rising temperatures cause coral bleaching and death",
        impact: ThreatImpact::High,
    },
    ThreatCard {
        title: "Ocean Acidification",
        description: "Acidic waters dissolve coral skeletons",
        impact: ThreatImpact::High,
    },
    ThreatCard {
        title: "Pollution",
        description: "Chemical runoff and plastic waste damage reefs",
        impact: ThreatImpact::Medium,
    },
];

pub struct ImportancePoint {
    pub heading: &'static str,
    pub detail: &'static str,
}

pub const IMPORTANCE: [ImportancePoint; 4] = [
    ImportancePoint {
        heading: "Biodiversity Hotspots",
        detail: "Support over 4,000 fish species and countless other marine organisms",
    },
    ImportancePoint {
        heading: "Coastal Protection",
        detail: "Act as natural barriers, protecting shorelines from storms and erosion",
    },
    ImportancePoint {
        heading: "Economic Value",
        detail: "Generate billions in tourism revenue and support fishing communities",
    },
    ImportancePoint {
        heading: "Climate Regulation",
        detail: "Help regulate ocean chemistry and carbon cycles",
    },
];

pub struct AnalysisCardCopy {
    pub title: &'static str,
    pub description: &'static str,
    pub upload_title: &'static str,
    pub glyph: &'static str,
}

pub fn analysis_card(kind: AnalysisKind) -> AnalysisCardCopy {
    match kind {
        AnalysisKind::CoralHealth => AnalysisCardCopy {
            title: "Coral Health Check",
            description: "Upload images to analyze coral health and detect diseases",
            upload_title: "Upload Coral Image",
            glyph: "\u{1fa7a}",
        },
        AnalysisKind::DebrisDetection => AnalysisCardCopy {
            title: "Detect Debris",
            description: "Identify and track debris in coral reef environments",
            upload_title: "Upload Reef Image",
            glyph: "\u{1f5d1}",
        },
    }
}
