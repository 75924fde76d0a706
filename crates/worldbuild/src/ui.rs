use serde::Serialize;

/// Which entity type the editor is focused on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Map,
    Area,
    Link,
}

/// Sub-state within a mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Details,
    Edit,
    EditItem,
    Label,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Map => "map",
            Mode::Area => "area",
            Mode::Link => "link",
        }
    }
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Details => "details",
            View::Edit => "edit",
            View::EditItem => "edit_item",
            View::Label => "label",
        }
    }
}

/// What gets published to subscribers on every change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub mode: Mode,
    pub view: View,
    /// Bumped on every cache commit so observers know to re-project lists.
    pub revision: u64,
}

impl UiState {
    pub fn flags(&self) -> UiFlags {
        UiFlags::derive(self.mode, self.view)
    }
}

/// Booleans the editor widgets key off. Always a pure function of `(mode, view)`;
/// never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UiFlags {
    pub building_map: bool,
    pub building_area: bool,
    pub building_link: bool,
    pub building_item: bool,
    pub building_label: bool,
    pub showing_map_details: bool,
    pub showing_area_details: bool,
    pub showing_link_details: bool,
    pub map_under_construction: bool,
    pub area_under_construction: bool,
    pub link_under_construction: bool,
    /// Clicking an area on the rendered map selects it.
    pub allow_area_selection: bool,
    pub allow_link_selection: bool,
    /// Selecting an area on another map switches the primary map.
    pub allow_map_switch: bool,
    /// The second map pane used to pick a cross-map link endpoint.
    pub show_link_editor_map: bool,
    pub editing: bool,
}

impl UiFlags {
    pub fn derive(mode: Mode, view: View) -> Self {
        let details = view == View::Details;
        let building_map = mode == Mode::Map && view == View::Edit;
        let building_area = mode == Mode::Area && view == View::Edit;
        let building_link = mode == Mode::Link && view == View::Edit;
        let building_label = mode == Mode::Map && view == View::Label;

        Self {
            building_map,
            building_area,
            building_link,
            building_item: view == View::EditItem,
            building_label,
            showing_map_details: mode == Mode::Map && details,
            showing_area_details: mode == Mode::Area && details,
            showing_link_details: mode == Mode::Link && details,
            map_under_construction: building_map || building_label,
            area_under_construction: building_area,
            link_under_construction: building_link,
            allow_area_selection: details || building_link,
            allow_link_selection: details,
            allow_map_switch: details && mode != Mode::Link,
            show_link_editor_map: building_link,
            editing: !details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [Mode; 3] = [Mode::Map, Mode::Area, Mode::Link];
    const VIEWS: [View; 4] = [View::Details, View::Edit, View::EditItem, View::Label];

    #[test]
    fn at_most_one_builder_is_active() {
        for m in MODES {
            for v in VIEWS {
                let f = UiFlags::derive(m, v);
                let n = [
                    f.building_map,
                    f.building_area,
                    f.building_link,
                    f.building_item,
                    f.building_label,
                ]
                .iter()
                .filter(|b| **b)
                .count();
                assert!(n <= 1, "{m:?}/{v:?}");
                assert_eq!(f.editing, n == 1 || v != View::Details);
            }
        }
    }

    #[test]
    fn link_edit_allows_picking_areas_but_not_switching_maps() {
        let f = UiFlags::derive(Mode::Link, View::Edit);
        assert!(f.link_under_construction);
        assert!(f.allow_area_selection);
        assert!(f.show_link_editor_map);
        assert!(!f.allow_map_switch);
        assert!(!f.allow_link_selection);
    }

    #[test]
    fn label_view_counts_as_map_construction() {
        let f = UiFlags::derive(Mode::Map, View::Label);
        assert!(f.building_label);
        assert!(f.map_under_construction);
        assert!(!f.building_map);
    }

    #[test]
    fn details_views_permit_jumping() {
        assert!(UiFlags::derive(Mode::Map, View::Details).allow_map_switch);
        assert!(UiFlags::derive(Mode::Area, View::Details).allow_map_switch);
        assert!(!UiFlags::derive(Mode::Link, View::Details).allow_map_switch);
    }
}
