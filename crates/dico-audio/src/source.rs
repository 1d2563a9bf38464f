use dico_chart::Location;

/// Where encoded music comes from. Also the coalescing key for decodes.
pub type MusicSource = Location;
