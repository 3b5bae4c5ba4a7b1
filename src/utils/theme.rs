//! Static display tables: team colors, circuit images, country flags.
//!
//! Built once at startup and passed by reference into the render step.

use std::collections::HashMap;

const DEFAULT_TEAM_COLOR: &str = "#333333";
const DEFAULT_FLAG: &str = "🏁";
const IMAGE_SUFFIX: &str = "%20carbon.png";

#[derive(Debug, Clone)]
pub struct TeamColors {
    colors: HashMap<&'static str, &'static str>,
}

impl TeamColors {
    pub fn current() -> Self {
        let colors = HashMap::from([
            ("mercedes", "#00D2BE"),
            ("red_bull", "#3671C6"),
            ("ferrari", "#E8002D"),
            ("mclaren", "#F58020"),
            ("alpine", "#2293D1"),
            ("rb", "#6692FF"),
            ("aston_martin", "#358C75"),
            ("williams", "#37BEDD"),
            ("sauber", "#C92D4B"),
            ("haas", "#B6BABD"),
        ]);
        Self { colors }
    }

    pub fn color_for(&self, team_id: &str) -> &'static str {
        self.colors
            .get(team_id.to_lowercase().as_str())
            .copied()
            .unwrap_or(DEFAULT_TEAM_COLOR)
    }

    pub fn default_color(&self) -> &'static str {
        DEFAULT_TEAM_COLOR
    }
}

/// Track-outline images, keyed by the API's circuit name.
#[derive(Debug, Clone)]
pub struct CircuitImages {
    base_url: String,
    fragments: HashMap<&'static str, &'static str>,
}

impl CircuitImages {
    pub fn new(base_url: &str) -> Self {
        // Both spellings the API has used for a handful of circuits.
        let fragments = HashMap::from([
            ("Bahrain International Circuit", "Bahrain"),
            ("Jeddah Corniche Circuit", "Saudi%20Arabia"),
            ("Albert Park Grand Prix Circuit", "Australia"),
            ("Albert Park Circuit", "Australia"),
            ("Suzuka Circuit", "Japan"),
            ("Shanghai International Circuit", "China"),
            ("Miami International Autodrome", "Miami"),
            ("Autodromo Enzo e Dino Ferrari", "Emilia%20Romagna"),
            ("Circuit de Monaco", "Monaco"),
            ("Circuit Gilles Villeneuve", "Canada"),
            ("Circuit de Barcelona-Catalunya", "Spain"),
            ("Red Bull Ring", "Austria"),
            ("Silverstone Circuit", "Great%20Britain"),
            ("Hungaroring", "Hungary"),
            ("Circuit de Spa-Francorchamps", "Belgium"),
            ("Circuit Zandvoort", "Netherlands"),
            ("Circuit Park Zandvoort", "Netherlands"),
            ("Autodromo Nazionale Monza", "Italy"),
            ("Baku City Circuit", "Azerbaijan"),
            ("Marina Bay Street Circuit", "Singapore"),
            ("Circuit of the Americas", "United%20States"),
            ("Autódromo Hermanos Rodríguez", "Mexico"),
            ("Autódromo José Carlos Pace", "Brazil"),
            ("Las Vegas Street Circuit", "Las%20Vegas"),
            ("Las Vegas Strip Circuit", "Las%20Vegas"),
            ("Lusail International Circuit", "Qatar"),
            ("Losail International Circuit", "Qatar"),
            ("Yas Marina Circuit", "Abu%20Dhabi"),
        ]);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fragments,
        }
    }

    /// Image URL only for circuits in the table.
    pub fn known_url(&self, circuit_name: &str) -> Option<String> {
        self.fragments
            .get(circuit_name)
            .map(|fragment| self.url_from_fragment(fragment))
    }

    /// Image URL for any circuit, guessing from the name when unmapped.
    pub fn url_for(&self, circuit_name: &str) -> String {
        self.known_url(circuit_name).unwrap_or_else(|| {
            let guessed = circuit_name.split_whitespace().collect::<Vec<_>>().join("%20");
            self.url_from_fragment(&guessed)
        })
    }

    fn url_from_fragment(&self, fragment: &str) -> String {
        format!("{}/{fragment}{IMAGE_SUFFIX}", self.base_url)
    }
}

#[derive(Debug, Clone)]
pub struct CountryFlags {
    flags: HashMap<&'static str, &'static str>,
}

impl CountryFlags {
    pub fn current() -> Self {
        let flags = HashMap::from([
            ("Australia", "🇦🇺"),
            ("Monaco", "🇲🇨"),
            ("Canada", "🇨🇦"),
            ("Italy", "🇮🇹"),
            ("UK", "🇬🇧"),
            ("USA", "🇺🇸"),
            ("United States", "🇺🇸"),
            ("Japan", "🇯🇵"),
            ("Brazil", "🇧🇷"),
            ("Mexico", "🇲🇽"),
            ("France", "🇫🇷"),
            ("Germany", "🇩🇪"),
            ("Spain", "🇪🇸"),
            ("Netherlands", "🇳🇱"),
            ("Belgium", "🇧🇪"),
            ("Austria", "🇦🇹"),
            ("Hungary", "🇭🇺"),
            ("Singapore", "🇸🇬"),
            ("Russia", "🇷🇺"),
            ("Azerbaijan", "🇦🇿"),
            ("UAE", "🇦🇪"),
            ("Saudi Arabia", "🇸🇦"),
            ("Qatar", "🇶🇦"),
            ("Portugal", "🇵🇹"),
            ("China", "🇨🇳"),
            ("Bahrain", "🇧🇭"),
        ]);
        Self { flags }
    }

    pub fn flag_for(&self, country: &str) -> &'static str {
        self.flags.get(country).copied().unwrap_or(DEFAULT_FLAG)
    }
}

/// Every table a widget may need.
#[derive(Debug, Clone)]
pub struct Theme {
    pub team_colors: TeamColors,
    pub circuit_images: CircuitImages,
    pub country_flags: CountryFlags,
}

impl Theme {
    pub fn new(image_base_url: &str) -> Self {
        Self {
            team_colors: TeamColors::current(),
            circuit_images: CircuitImages::new(image_base_url),
            country_flags: CountryFlags::current(),
        }
    }
}
