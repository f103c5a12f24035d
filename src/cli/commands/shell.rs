//! `whs shell` command - interactive menus for one session

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Password, Select};
use miette::{IntoDiagnostic, Result};
use tracing::debug;

use crate::cli::helpers::{format_alias, truncate_str};
use crate::cli::output::{effective_format, render_stock, render_summary, render_tree};
use crate::cli::session::Session;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::input::{parse_price, parse_year, require_text};
use crate::core::{
    Config, ItemId, ProductForm, ProductInfo, ProductKind, Warehouse, WarehouseError,
};
use crate::entities::{Detail, Product};

const MAIN_MENU: &[&str] = &["Register", "Log in", "Quit"];
const WAREHOUSE_MENU: &[&str] = &["Stock", "Add", "Delete", "Summary", "Log out"];

pub fn run(global: &GlobalOpts, config: Config) -> Result<()> {
    let format = effective_format(global, &config);
    let mut shell = Shell {
        session: Session::new(config),
        theme: ColorfulTheme::default(),
        format,
    };
    shell.main_loop()
}

struct Shell {
    session: Session,
    theme: ColorfulTheme,
    format: OutputFormat,
}

impl Shell {
    fn main_loop(&mut self) -> Result<()> {
        loop {
            let done = match self.session.current_login() {
                None => self.main_menu()?,
                Some(_) => {
                    self.warehouse_menu()?;
                    false
                }
            };
            if done {
                return Ok(());
            }
        }
    }

    /// Returns true when the user chose to quit
    fn main_menu(&mut self) -> Result<bool> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Warehouse")
            .items(MAIN_MENU)
            .default(0)
            .interact()
            .into_diagnostic()?;

        match choice {
            0 => {
                let (login, password) = self.credentials()?;
                match self.session.register(&login, &password) {
                    Ok(warehouse) => {
                        let name = warehouse.name().to_string();
                        success(&format!("Registered warehouse '{}'", name));
                    }
                    Err(e) => failure(&e.to_string()),
                }
            }
            1 => {
                let (login, password) = self.credentials()?;
                match self.session.login(&login, &password) {
                    Ok(warehouse) => {
                        let name = warehouse.name().to_string();
                        success(&format!("Logged in as '{}'", name));
                    }
                    Err(e) => failure(&e.to_string()),
                }
            }
            _ => return Ok(true),
        }
        Ok(false)
    }

    fn credentials(&self) -> Result<(String, String)> {
        let login: String = Input::with_theme(&self.theme)
            .with_prompt("Login")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let password = Password::with_theme(&self.theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()
            .into_diagnostic()?;
        Ok((login, password))
    }

    fn warehouse_menu(&mut self) -> Result<()> {
        let prompt = format!(
            "Warehouse '{}'",
            self.session.current_login().unwrap_or_default()
        );
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(WAREHOUSE_MENU)
            .default(0)
            .interact()
            .into_diagnostic()?;

        match choice {
            0 => self.stock(),
            1 => self.add(),
            2 => self.delete(),
            3 => {
                print!("{}", render_summary(&self.warehouse()?.summary(), self.format)?);
                Ok(())
            }
            _ => {
                if let Some(login) = self.session.logout() {
                    success(&format!("Logged out '{}'", login));
                }
                Ok(())
            }
        }
    }

    fn warehouse(&self) -> Result<&Warehouse> {
        self.session
            .warehouse()
            .ok_or_else(|| miette::miette!("not logged in"))
    }

    fn warehouse_mut(&mut self) -> Result<&mut Warehouse> {
        self.session
            .warehouse_mut()
            .ok_or_else(|| miette::miette!("not logged in"))
    }

    fn stock(&self) -> Result<()> {
        let warehouse = self.warehouse()?;
        print!("{}", render_stock(warehouse, None, self.format)?);
        if warehouse.is_empty() {
            return Ok(());
        }

        let products: Vec<&Product> = warehouse.products(None).collect();
        let mut labels: Vec<String> = products.iter().map(|p| item_label(p, warehouse)).collect();
        labels.push("Back".to_string());

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Inspect an item")
            .items(&labels)
            .default(labels.len() - 1)
            .interact()
            .into_diagnostic()?;

        if let Some(product) = products.get(choice) {
            println!();
            println!("{}", product.describe());
            if product.kind() != ProductKind::Detail {
                println!();
                print!("{}", render_tree(product, warehouse.short_id(product.id())));
            }
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let labels: Vec<&str> = ProductKind::all().iter().map(|k| k.label()).collect();
        let choice = Select::with_theme(&self.theme)
            .with_prompt("What to add")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;
        let kind = ProductKind::all()[choice];

        let form = self.product_form()?;
        let config = self.session.config();
        let info = match form.into_info(config.default_year(), config.default_price()) {
            Ok(info) => info,
            Err(e) => {
                failure(&e.to_string());
                return Ok(());
            }
        };

        let result = match kind.component_kind() {
            None => {
                let material: String = Input::with_theme(&self.theme)
                    .with_prompt("Material")
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                match require_text("material", &material) {
                    Ok(material) => Ok(self.warehouse_mut()?.buy(Detail::new(info, material))),
                    Err(e) => {
                        failure(&e.to_string());
                        return Ok(());
                    }
                }
            }
            Some(component_kind) => {
                let components = self.pick_components(component_kind)?;
                build_composite(self.warehouse_mut()?, kind, info, &components)
            }
        };

        match result {
            Ok(id) => success(&added_message(self.warehouse()?, &id)),
            Err(e) => failure(&e.to_string()),
        }
        Ok(())
    }

    fn product_form(&self) -> Result<ProductForm> {
        let config = self.session.config();
        let name: String = Input::with_theme(&self.theme)
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let manufacturer: String = Input::with_theme(&self.theme)
            .with_prompt("Manufacturer")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let year: String = Input::with_theme(&self.theme)
            .with_prompt(format!("Year [{}]", config.default_year()))
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                if input.trim().is_empty() {
                    return Ok(());
                }
                parse_year(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .into_diagnostic()?;
        let price: String = Input::with_theme(&self.theme)
            .with_prompt(format!("Price [{}]", config.default_price()))
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                if input.trim().is_empty() {
                    return Ok(());
                }
                parse_price(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .into_diagnostic()?;

        Ok(ProductForm {
            name,
            manufacturer,
            year,
            price,
        })
    }

    /// Search in-stock candidates and let the user pick any number of them
    fn pick_components(&self, kind: ProductKind) -> Result<Vec<ItemId>> {
        let query: String = Input::with_theme(&self.theme)
            .with_prompt(format!("Search {} (blank lists all)", kind.plural().to_lowercase()))
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let candidates = component_choices(self.warehouse()?, kind, &query);
        if candidates.is_empty() {
            println!(
                "{}",
                style(format!("No {} found for '{}'.", kind.plural().to_lowercase(), query)).dim()
            );
            return Ok(Vec::new());
        }

        let labels: Vec<&str> = candidates.iter().map(|(_, label)| label.as_str()).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Components (space to select)")
            .items(&labels)
            .interact()
            .into_diagnostic()?;

        let ids = picked_ids(&candidates, &picked);
        debug!(count = ids.len(), %kind, "picked components");
        Ok(ids)
    }

    fn delete(&mut self) -> Result<()> {
        let query: String = Input::with_theme(&self.theme)
            .with_prompt("Search items to remove")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let choices = removal_choices(self.warehouse()?, &query);
        if choices.is_empty() {
            println!("{}", style(format!("No items found for '{}'.", query)).dim());
            return Ok(());
        }

        let labels: Vec<&str> = choices.iter().map(|(_, label)| label.as_str()).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt("Items to remove (space to select)")
            .items(&labels)
            .interact()
            .into_diagnostic()?;
        let chosen = match removal_selection(&choices, &picked) {
            Ok(chosen) => chosen,
            Err(message) => {
                failure(message);
                return Ok(());
            }
        };

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Remove {} item(s)?", chosen.len()))
            .default(true)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            return Ok(());
        }

        let removed = self.warehouse_mut()?.sell_many(&chosen).len();
        success(&format!("Removed {} item(s)", removed));
        Ok(())
    }
}

/// A menu entry: the item it stands for and the text shown
type Choice = (ItemId, String);

const NOTHING_SELECTED: &str = "Select at least one item";

/// In-stock items of `kind` matching `query`, labelled for the component picker
fn component_choices(warehouse: &Warehouse, kind: ProductKind, query: &str) -> Vec<Choice> {
    warehouse
        .search(Some(kind), query.trim())
        .into_iter()
        .map(|p| (*p.id(), item_label(p, warehouse)))
        .collect()
}

/// Items of any kind matching `query`, labelled `<Kind>: <name>`
fn removal_choices(warehouse: &Warehouse, query: &str) -> Vec<Choice> {
    warehouse
        .search(None, query.trim())
        .into_iter()
        .map(|p| (*p.id(), format!("{}: {}", p.kind().label(), p.name())))
        .collect()
}

/// Map menu indices back to item IDs, skipping out-of-range indices
fn picked_ids(choices: &[Choice], picked: &[usize]) -> Vec<ItemId> {
    picked
        .iter()
        .filter_map(|&i| choices.get(i).map(|(id, _)| *id))
        .collect()
}

/// Removal needs at least one picked item
fn removal_selection(
    choices: &[Choice],
    picked: &[usize],
) -> std::result::Result<Vec<ItemId>, &'static str> {
    let ids = picked_ids(choices, picked);
    if ids.is_empty() {
        Err(NOTHING_SELECTED)
    } else {
        Ok(ids)
    }
}

/// Build an assembly or a mechanism from the picked components
fn build_composite(
    warehouse: &mut Warehouse,
    kind: ProductKind,
    info: ProductInfo,
    components: &[ItemId],
) -> std::result::Result<ItemId, WarehouseError> {
    if kind == ProductKind::Mechanism {
        warehouse.build_mechanism(info, components)
    } else {
        warehouse.assemble(info, components)
    }
}

fn added_message(warehouse: &Warehouse, id: &ItemId) -> String {
    let name = warehouse.get(id).map(|p| p.name()).unwrap_or_default();
    format!(
        "Added {} {} {}",
        id.kind().label(),
        style(format_alias(warehouse.short_id(id))).cyan(),
        name
    )
}

/// `@3 Detail: Bolt (ACME, 2020)`
fn item_label(product: &Product, warehouse: &Warehouse) -> String {
    let info = product.info();
    format!(
        "{} {}: {} ({}, {})",
        format_alias(warehouse.short_id(product.id())),
        product.kind().label(),
        truncate_str(&info.name, 40),
        truncate_str(&info.manufacturer, 24),
        info.year
    )
}

fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

fn failure(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Assembly;

    fn stocked() -> (Warehouse, ItemId, ItemId, ItemId) {
        let mut wh = Warehouse::new("alice");
        let bolt = wh.buy(Detail::new(ProductInfo::new("Bolt", "ACME", 2020, 0.5), "steel"));
        let nut = wh.buy(Detail::new(ProductInfo::new("Nut", "ACME", 2019, 0.25), "brass"));
        let frame = wh.buy(Assembly::new(ProductInfo::new("Bolt rack", "Racks", 2021, 4.0), Vec::new()));
        (wh, bolt, nut, frame)
    }

    #[test]
    fn test_removal_choices_label_kind_and_name() {
        let (wh, bolt, _, frame) = stocked();
        let choices = removal_choices(&wh, " BOLT ");
        assert_eq!(
            choices,
            vec![
                (bolt, "Detail: Bolt".to_string()),
                (frame, "Assembly: Bolt rack".to_string()),
            ]
        );
        assert!(removal_choices(&wh, "gear").is_empty());
    }

    #[test]
    fn test_removal_requires_a_selection() {
        let (wh, bolt, _, frame) = stocked();
        let choices = removal_choices(&wh, "bolt");
        assert_eq!(removal_selection(&choices, &[]), Err("Select at least one item"));
        assert_eq!(removal_selection(&choices, &[9]), Err(NOTHING_SELECTED));
        assert_eq!(removal_selection(&choices, &[1, 0]), Ok(vec![frame, bolt]));
    }

    #[test]
    fn test_component_choices_only_offer_the_component_kind() {
        console::set_colors_enabled(false);
        let (wh, bolt, nut, _) = stocked();
        let choices = component_choices(&wh, ProductKind::Detail, "");
        assert_eq!(picked_ids(&choices, &[0, 1]), vec![bolt, nut]);
        assert_eq!(choices[1].1, "@2 Detail: Nut (ACME, 2019)");
        assert!(component_choices(&wh, ProductKind::Assembly, "nut").is_empty());
    }

    #[test]
    fn test_build_composite_from_picked_components() {
        console::set_colors_enabled(false);
        let (mut wh, bolt, nut, frame) = stocked();
        let choices = component_choices(&wh, ProductKind::Detail, "");
        let picked = picked_ids(&choices, &[0, 1]);

        let shaft = build_composite(
            &mut wh,
            ProductKind::Assembly,
            ProductInfo::new("Shaft", "ACME", 2022, 5.0),
            &picked,
        )
        .unwrap();
        assert!(!wh.contains(&bolt) && !wh.contains(&nut));
        assert_eq!(added_message(&wh, &shaft), "Added Assembly @4 Shaft");

        let gearbox = build_composite(
            &mut wh,
            ProductKind::Mechanism,
            ProductInfo::new("Gearbox", "Gears", 2023, 40.0),
            &[shaft, frame],
        )
        .unwrap();
        assert_eq!(wh.count(ProductKind::Assembly), 0);
        assert_eq!(added_message(&wh, &gearbox), "Added Mechanism @5 Gearbox");
    }

    #[test]
    fn test_build_composite_rejects_wrong_kind() {
        let (mut wh, bolt, _, _) = stocked();
        let result = build_composite(
            &mut wh,
            ProductKind::Mechanism,
            ProductInfo::new("Gearbox", "Gears", 2023, 40.0),
            &[bolt],
        );
        assert!(matches!(result, Err(WarehouseError::WrongComponentKind { .. })));
        assert!(wh.contains(&bolt));
    }
}
