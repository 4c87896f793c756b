use clap::Parser;
use leadmap::{BUSINESS_TYPES, BatchPlan, LocationKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leadmap")]
#[command(about = "Scrapes business listings from Google Maps for a set of locations")]
#[command(version)]
pub struct Args {
    /// State to search in, full name or postal code
    #[arg(short, long)]
    pub state: String,

    /// City to search (repeatable)
    #[arg(long = "city", required_unless_present = "zips", conflicts_with = "zips")]
    pub cities: Vec<String>,

    /// 5-digit zip code to search (repeatable)
    #[arg(long = "zip", value_parser = parse_zip)]
    pub zips: Vec<String>,

    /// Business type to search for (repeatable)
    #[arg(short, long = "business-type", default_value = "liquor store")]
    pub business_types: Vec<String>,

    /// Search every known business type
    #[arg(long, conflicts_with = "business_types")]
    pub all_business_types: bool,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL, overrides the config file and WEBDRIVER_URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Write results here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn plan(&self) -> BatchPlan {
        let (location_kind, locations) = if self.zips.is_empty() {
            (LocationKind::City, self.cities.clone())
        } else {
            (LocationKind::ZipCode, self.zips.clone())
        };

        let business_types = if self.all_business_types {
            BUSINESS_TYPES.iter().map(|t| t.to_string()).collect()
        } else {
            self.business_types.clone()
        };

        BatchPlan {
            state: self.state.clone(),
            location_kind,
            locations,
            business_types,
        }
    }
}

fn parse_zip(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.len() == 5 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("'{value}' is not a 5-digit zip code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("leadmap").chain(args.iter().copied()))
    }

    #[test]
    fn test_city_plan_with_default_type() {
        let args = parse(&["--state", "Alabama", "--city", "Mobile", "--city", "Daphne"]).unwrap();
        let plan = args.plan();
        assert_eq!(plan.location_kind, LocationKind::City);
        assert_eq!(plan.locations, vec!["Mobile", "Daphne"]);
        assert_eq!(plan.business_types, vec!["liquor store"]);
        assert_eq!(plan.state_code(), "AL");
    }

    #[test]
    fn test_zip_plan() {
        let args = parse(&["-s", "AL", "--zip", "36602", "-b", "bar", "-b", "mall"]).unwrap();
        let plan = args.plan();
        assert_eq!(plan.location_kind, LocationKind::ZipCode);
        assert_eq!(plan.locations, vec!["36602"]);
        assert_eq!(plan.business_types, vec!["bar", "mall"]);
    }

    #[test]
    fn test_all_business_types() {
        let args = parse(&["-s", "AL", "--city", "Mobile", "--all-business-types"]).unwrap();
        assert_eq!(args.plan().business_types.len(), BUSINESS_TYPES.len());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["-s", "AL"]).is_err());
        assert!(parse(&["-s", "AL", "--zip", "3660"]).is_err());
        assert!(parse(&["-s", "AL", "--zip", "3660a"]).is_err());
        assert!(parse(&["-s", "AL", "--city", "Mobile", "--zip", "36602"]).is_err());
    }
}
