//! Dropdown menu options and their selection rules.

use serde::{Deserialize, Serialize};

/// Name of the menu holding majors.
pub const MAJORS_MENU: &str = "majors";
/// Group header selecting any declared major.
pub const DECLARED: &str = "Declared";
/// Group header selecting any undeclared major.
pub const UNDECLARED: &str = "Undeclared";

/// Extra behaviour attached to an option when it is clicked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OnClick {
    /// "Declared"/"Undeclared" headers of the majors menu
    MajorOptionGroup,
}

/// One entry in a dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuOption {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
    #[serde(default)]
    pub selected: bool,
}

impl MenuOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            on_click: None,
            selected: false,
        }
    }

    /// Option whose name doubles as its value.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }

    pub fn with_on_click(mut self, on_click: OnClick) -> Self {
        self.on_click = Some(on_click);
        self
    }
}

/// Menu options in display order; `None` renders as a separator.
pub type MenuOptions = Vec<Option<MenuOption>>;

fn set_selected(options: &mut [Option<MenuOption>], is_selected: impl Fn(&MenuOption) -> bool) {
    for option in options.iter_mut().flatten() {
        option.selected = is_selected(option);
    }
}

/// Toggle the option called `name` in `menu`, then apply group rules.
///
/// In the majors menu, selecting "Declared" deselects everything else and
/// selecting "Undeclared" deselects "Declared". Returns the number of
/// selected options afterwards; an unknown name changes nothing.
pub fn click_option(menu: &str, options: &mut [Option<MenuOption>], name: &str) -> usize {
    let clicked = options
        .iter_mut()
        .flatten()
        .find(|option| option.name == name)
        .map(|option| {
            option.selected = !option.selected;
            (option.selected, option.on_click)
        });

    if let Some((true, Some(OnClick::MajorOptionGroup))) = clicked {
        if menu == MAJORS_MENU {
            match name {
                DECLARED => set_selected(options, |major| major.name == DECLARED),
                UNDECLARED => {
                    for option in options.iter_mut().flatten() {
                        if option.name == DECLARED {
                            option.selected = false;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    selected_count(options)
}

pub fn selected_count(options: &[Option<MenuOption>]) -> usize {
    options.iter().flatten().filter(|option| option.selected).count()
}
