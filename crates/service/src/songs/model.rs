use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::SONG_COLS;
use crate::storage::{cell_text, Cell};

/// Raw song payload from a client: any subset of the columns, any scalar values.
pub type SongInput = Map<String, Value>;

/// One row of the Songs sheet. Field order follows [`SONG_COLS`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Artist", default)]
    pub artist: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Tempo", default)]
    pub tempo: String,
    #[serde(rename = "Theme", default)]
    pub theme: String,
    #[serde(rename = "Season", default)]
    pub season: String,
    #[serde(rename = "Style", default)]
    pub style: String,
    #[serde(rename = "Lyrics", default)]
    pub lyrics: String,
    #[serde(rename = "DocLinks", default)]
    pub doc_links: String,
    #[serde(rename = "YouTube", default)]
    pub youtube: String,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: String,
}

impl Song {
    fn fields(&self) -> [&String; 13] {
        [
            &self.id,
            &self.title,
            &self.artist,
            &self.category,
            &self.key,
            &self.tempo,
            &self.theme,
            &self.season,
            &self.style,
            &self.lyrics,
            &self.doc_links,
            &self.youtube,
            &self.updated_at,
        ]
    }

    fn fields_mut(&mut self) -> [&mut String; 13] {
        [
            &mut self.id,
            &mut self.title,
            &mut self.artist,
            &mut self.category,
            &mut self.key,
            &mut self.tempo,
            &mut self.theme,
            &mut self.season,
            &mut self.style,
            &mut self.lyrics,
            &mut self.doc_links,
            &mut self.youtube,
            &mut self.updated_at,
        ]
    }

    /// Read a stored row as-is; missing cells become empty strings.
    pub fn from_row(row: &[Cell]) -> Self {
        let mut song = Song::default();
        for (i, field) in song.fields_mut().into_iter().enumerate() {
            *field = cell_text(row.get(i));
        }
        song
    }

    /// Keep only the declared columns, each stringified and trimmed.
    pub fn from_input(input: &SongInput) -> Self {
        let mut song = Song::default();
        for (name, field) in SONG_COLS.iter().zip(song.fields_mut()) {
            *field = cell_text(input.get(*name)).trim().to_string();
        }
        song
    }

    pub fn to_row(&self) -> Vec<Cell> {
        self.fields().into_iter().map(|f| Value::String(f.clone())).collect()
    }
}

/// Outcome of an upsert: `updated` is true when an existing row was rewritten.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveSongResult {
    pub ok: bool,
    pub id: String,
    pub updated: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_drops_unknown_fields_and_trims() {
        let input = json!({
            "Title": "  Amazing Grace ",
            "Tempo": 72,
            "Lyrics": null,
            "Composer": "Newton"
        });
        let song = Song::from_input(input.as_object().unwrap());
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.tempo, "72");
        assert_eq!(song.lyrics, "");
        let out = serde_json::to_value(&song).unwrap();
        assert!(out.get("Composer").is_none());
        assert_eq!(out.as_object().unwrap().len(), SONG_COLS.len());
    }

    #[test]
    fn serializes_in_column_order() {
        let song = Song { id: "S-1".into(), ..Default::default() };
        let text = serde_json::to_string(&song).unwrap();
        let positions: Vec<usize> = SONG_COLS
            .iter()
            .map(|c| text.find(&format!("\"{c}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn short_row_pads_with_empty_strings() {
        let song = Song::from_row(&[json!("S-abc"), json!("Title")]);
        assert_eq!(song.id, "S-abc");
        assert_eq!(song.title, "Title");
        assert_eq!(song.updated_at, "");
        assert_eq!(song.to_row().len(), 13);
    }

    #[test]
    fn clean_result_omits_empty_msg() {
        let v = serde_json::to_value(CleanResult { ok: true, msg: None }).unwrap();
        assert_eq!(v, json!({"ok": true}));
    }
}
