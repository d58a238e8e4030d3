use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum UiLocale {
    RuRu,
    EnUs,
}

#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct UiI18n {
    pub locale: UiLocale,
}

impl Default for UiI18n {
    fn default() -> Self {
        Self {
            locale: UiLocale::RuRu,
        }
    }
}

impl UiLocale {
    pub(super) fn toggled(self) -> Self {
        match self {
            UiLocale::RuRu => UiLocale::EnUs,
            UiLocale::EnUs => UiLocale::RuRu,
        }
    }

    pub(super) fn is_ru(self) -> bool {
        matches!(self, UiLocale::RuRu)
    }

    pub(super) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ru" | "ru-ru" => Some(UiLocale::RuRu),
            "en" | "en-us" => Some(UiLocale::EnUs),
            _ => None,
        }
    }
}

pub(super) fn no_data_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Нет данных"
    } else {
        "No data"
    }
}

pub(super) fn no_username_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Нет username"
    } else {
        "No username"
    }
}

pub(super) fn members_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Подписчиков"
    } else {
        "Subscribers"
    }
}

pub(super) fn messages_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Сообщений"
    } else {
        "Messages"
    }
}

pub(super) fn open_channel_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Перейти в канал"
    } else {
        "Open channel"
    }
}

pub(super) fn channel_list_title(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Каналы"
    } else {
        "Channels"
    }
}

pub(super) fn language_toggle_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Язык: русский"
    } else {
        "Language: English"
    }
}

/// Glyph on the fullscreen button: enter while windowed, exit while fullscreen.
pub(super) fn fullscreen_button_label(fullscreen: bool) -> &'static str {
    if fullscreen {
        "⮽"
    } else {
        "⛶"
    }
}

pub(super) fn fullscreen_hover_text(fullscreen: bool, locale: UiLocale) -> &'static str {
    match (locale, fullscreen) {
        (UiLocale::RuRu, false) => "Полный экран",
        (UiLocale::RuRu, true) => "Выйти из полноэкранного режима",
        (UiLocale::EnUs, false) => "Fullscreen",
        (UiLocale::EnUs, true) => "Exit fullscreen",
    }
}

pub(super) fn loading_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Загрузка карты..."
    } else {
        "Loading map..."
    }
}

pub(super) fn load_failed_label(locale: UiLocale) -> &'static str {
    if locale.is_ru() {
        "Не удалось загрузить карту"
    } else {
        "Map failed to load"
    }
}

/// `Подписчиков: 1200` or the "no data" text when the count is missing.
pub(super) fn count_line(label: &str, count: Option<u64>, locale: UiLocale) -> String {
    match count {
        Some(count) => format!("{label}: {count}"),
        None => format!("{label}: {}", no_data_label(locale)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_short_and_region_forms() {
        assert_eq!(UiLocale::parse("ru"), Some(UiLocale::RuRu));
        assert_eq!(UiLocale::parse(" EN_us "), Some(UiLocale::EnUs));
        assert_eq!(UiLocale::parse("de"), None);
    }

    #[test]
    fn count_line_falls_back_to_no_data() {
        assert_eq!(
            count_line(members_label(UiLocale::RuRu), None, UiLocale::RuRu),
            "Подписчиков: Нет данных"
        );
        assert_eq!(
            count_line(messages_label(UiLocale::EnUs), Some(0), UiLocale::EnUs),
            "Messages: 0"
        );
    }

    #[test]
    fn toggled_round_trips() {
        assert_eq!(UiLocale::RuRu.toggled().toggled(), UiLocale::RuRu);
        assert_eq!(UiI18n::default().locale, UiLocale::RuRu);
    }
}
