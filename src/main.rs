//! Text-menu driver. Every menu choice maps to one `GameSession` call.

use anyhow::{Context, Result};
use clap::Parser;
use quest_chronicles::build_info::LONG_VERSION;
use quest_chronicles::character::{create_character, Archetype, Character, CharacterStore};
use quest_chronicles::combat::{ActionSource, CombatEvent, CombatOutcome, Enemy, PlayerAction};
use quest_chronicles::core::GameSession;
use quest_chronicles::data::{create_default_data_files, load_game_data, DataError};
use quest_chronicles::items::ItemTable;
use quest_chronicles::quests::{validate_prerequisites, QuestDefinition, QuestTable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quest Chronicles - a turn-based text RPG
#[derive(Parser, Debug)]
#[command(name = "quest-chronicles")]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
struct Args {
    /// Directory for character save files (defaults to the platform data dir)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Directory holding quests.txt and items.txt
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Seed for reproducible battles
    #[arg(long)]
    seed: Option<u64>,
}

/// Line-based terminal input. `None` from `prompt` means input is closed.
struct Console<R> {
    input: R,
    enemy_name: String,
}

impl<R: BufRead> Console<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            enemy_name: String::new(),
        }
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until the answer is a number in `1..=max`.
    fn choose(&mut self, message: &str, max: u32) -> io::Result<Option<u32>> {
        loop {
            let Some(answer) = self.prompt(message)? else {
                return Ok(None);
            };
            match answer.parse::<u32>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                Ok(_) => println!("Invalid choice."),
                Err(_) => println!("Please enter a number."),
            }
        }
    }
}

impl<R: BufRead> ActionSource for Console<R> {
    fn next_action(&mut self, turn: u32, character: &Character, enemy: &Enemy) -> PlayerAction {
        self.enemy_name = enemy.name.clone();
        println!("\n--- Turn {} ---", turn);
        println!(
            "{}: HP={}/{}",
            character.name, character.health, character.max_health
        );
        println!("{}: HP={}/{}", enemy.name, enemy.health, enemy.max_health);
        for (i, action) in PlayerAction::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, action.name());
        }

        match self.choose("Choose action: ", PlayerAction::ALL.len() as u32) {
            Ok(Some(n)) => PlayerAction::ALL[(n - 1) as usize],
            // Closed input: try to leave the fight.
            _ => PlayerAction::Escape,
        }
    }

    fn observe(&mut self, events: &[CombatEvent]) {
        for event in events {
            println!(">>> {}", describe_event(event, &self.enemy_name));
        }
    }
}

fn describe_event(event: &CombatEvent, enemy: &str) -> String {
    match event {
        CombatEvent::PlayerAttack { damage } => format!("You hit {} for {} damage.", enemy, damage),
        CombatEvent::SpecialAbility {
            ability,
            damage,
            healed,
            critical,
            ..
        } => {
            if *damage == 0 {
                format!("{}! Healed for {} health.", ability, healed)
            } else if *critical {
                format!("{}! Dealt {} massive damage.", ability, damage)
            } else {
                format!("{}! Dealt {} damage.", ability, damage)
            }
        }
        CombatEvent::EscapeSucceeded => "Escaped successfully!".to_string(),
        CombatEvent::EscapeFailed => "Escape failed!".to_string(),
        CombatEvent::EnemyAttack { damage } => format!("{} hits you for {} damage.", enemy, damage),
        CombatEvent::EnemyDied {
            xp_gained,
            gold_gained,
        } => format!(
            "{} is defeated! Gained {} XP and {} gold.",
            enemy, xp_gained, gold_gained
        ),
        CombatEvent::PlayerDied => "You have fallen in battle.".to_string(),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quest_chronicles=warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Loads the tables, writing starter files first if they are missing.
fn load_data(dir: &Path) -> Result<(QuestTable, ItemTable)> {
    let (quests, items) = match load_game_data(dir) {
        Ok(tables) => tables,
        Err(DataError::MissingDataFile(path)) => {
            println!("Creating default game data ({} missing)...", path);
            create_default_data_files(dir).context("creating default data files")?;
            load_game_data(dir).context("loading default game data")?
        }
        Err(e) => return Err(e).context("loading game data"),
    };

    if let Err(e) = validate_prerequisites(&quests) {
        tracing::warn!(error = %e, "quest table has broken prerequisites");
        println!("Warning: {}", e);
    }
    Ok((quests, items))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let (quests, items) = load_data(&args.data_dir)?;
    println!("Game data loaded: {} quests, {} items.", quests.len(), items.len());

    let save_dir = args.save_dir.unwrap_or_else(CharacterStore::default_dir);
    let store = CharacterStore::new(&save_dir)
        .with_context(|| format!("opening save directory {}", save_dir.display()))?;

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut game = Game {
        console: Console::new(stdin.lock()),
        store,
        quests,
        items,
        rng,
    };

    println!("{}", "=".repeat(50));
    println!("     QUEST CHRONICLES - A TURN-BASED RPG ADVENTURE");
    println!("{}", "=".repeat(50));

    game.main_menu()?;
    println!("\nThanks for playing Quest Chronicles!");
    Ok(())
}

struct Game<R> {
    console: Console<R>,
    store: CharacterStore,
    quests: QuestTable,
    items: ItemTable,
    rng: ChaCha8Rng,
}

impl<R: BufRead> Game<R> {
    fn main_menu(&mut self) -> Result<()> {
        loop {
            println!("\n=== MAIN MENU ===");
            println!("1. New Game");
            println!("2. Load Game");
            println!("3. Exit");

            match self.console.choose("Enter choice (1-3): ", 3)? {
                Some(1) => self.new_game()?,
                Some(2) => self.load_game()?,
                _ => return Ok(()),
            }
        }
    }

    fn new_game(&mut self) -> Result<()> {
        println!("\n=== NEW GAME ===");
        let Some(name) = self.console.prompt("Enter character name: ")? else {
            return Ok(());
        };
        let names: Vec<&str> = Archetype::ALL.iter().map(|a| a.name()).collect();
        println!("Classes: {}", names.join(", "));
        let Some(class) = self.console.prompt("Choose class: ")? else {
            return Ok(());
        };

        match create_character(&name, &class) {
            Ok(character) => {
                println!("Character {} created successfully!", character.name);
                self.store.save(&character)?;
                self.play(character)
            }
            Err(e) => {
                println!("Error creating character: {}", e);
                Ok(())
            }
        }
    }

    fn load_game(&mut self) -> Result<()> {
        println!("\n=== LOAD GAME ===");
        let saved = self.store.list();
        if saved.is_empty() {
            println!("No saved games found.");
            return Ok(());
        }
        println!("Saved Characters:");
        for name in &saved {
            println!("- {}", name);
        }

        let Some(name) = self.console.prompt("Enter character name to load: ")? else {
            return Ok(());
        };
        match self.store.load(&name) {
            Ok(character) => {
                println!("Loaded {} successfully!", character.name);
                self.play(character)
            }
            Err(e) => {
                println!("Error loading game: {}", e);
                Ok(())
            }
        }
    }

    fn play(&mut self, character: Character) -> Result<()> {
        let mut session = GameSession::new(character, self.quests.clone(), self.items.clone());

        loop {
            if session.is_dead() && !self.handle_death(&mut session)? {
                return Ok(());
            }

            println!("\n=== GAME MENU ({}) ===", session.character.name);
            println!("1. View Character Stats");
            println!("2. View Inventory");
            println!("3. Quest Menu");
            println!("4. Explore (Find Battles)");
            println!("5. Shop");
            println!("6. Save and Quit");

            match self.console.choose("Enter choice (1-6): ", 6)? {
                Some(1) => show_stats(&session),
                Some(2) => self.inventory_menu(&mut session)?,
                Some(3) => self.quest_menu(&mut session)?,
                Some(4) => self.explore(&mut session),
                Some(5) => self.shop(&mut session)?,
                _ => {
                    self.store.save(&session.character)?;
                    println!("Game saved. Returning to main menu.");
                    return Ok(());
                }
            }
        }
    }

    /// Returns false when the player gives up and leaves the session.
    fn handle_death(&mut self, session: &mut GameSession) -> Result<bool> {
        println!("\n=== YOU HAVE DIED ===");
        println!("1. Revive (return at half health, keep items)");
        println!("2. Quit to Main Menu");

        if self.console.choose("Choice: ", 2)? == Some(1) {
            session.revive();
            println!("You have been revived with {} health.", session.character.health);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn inventory_menu(&mut self, session: &mut GameSession) -> Result<()> {
        loop {
            println!("\n=== INVENTORY ({} gold) ===", session.character.gold);
            let summary = session.inventory_summary();
            if summary.is_empty() {
                println!("(empty)");
            }
            for entry in &summary {
                let name = entry.name.as_deref().unwrap_or("Unknown item");
                println!("- {} x{} (ID: {})", name, entry.count, entry.item_id);
            }

            println!("\n1. Use Item");
            println!("2. Equip Weapon");
            println!("3. Equip Armor");
            println!("4. Unequip Weapon");
            println!("5. Unequip Armor");
            println!("6. Back");

            let choice = match self.console.choose("Choice: ", 6)? {
                Some(n) if n < 6 => n,
                _ => return Ok(()),
            };

            let outcome = match choice {
                1..=3 => {
                    let Some(item_id) = self.console.prompt("Enter item ID: ")? else {
                        return Ok(());
                    };
                    match choice {
                        1 => session.use_item(&item_id),
                        2 => session.equip_weapon(&item_id),
                        _ => session.equip_armor(&item_id),
                    }
                }
                4 => session
                    .unequip_weapon()
                    .map(|item| item.map_or("No weapon equipped.".to_string(), |id| format!("Unequipped {}.", id))),
                _ => session
                    .unequip_armor()
                    .map(|item| item.map_or("No armor equipped.".to_string(), |id| format!("Unequipped {}.", id))),
            };

            match outcome {
                Ok(message) => println!("{}", message),
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    fn quest_menu(&mut self, session: &mut GameSession) -> Result<()> {
        loop {
            println!("\n=== QUEST MENU ===");
            println!("1. View Active Quests");
            println!("2. View Available Quests");
            println!("3. View Completed Quests");
            println!("4. Accept Quest");
            println!("5. Abandon Quest");
            println!("6. Complete Quest");
            println!("7. View Quest Chain");
            println!("8. Back");

            match self.console.choose("Choice: ", 8)? {
                Some(1) => print_quests(&session.active_quests()),
                Some(2) => print_quests(&session.available_quests()),
                Some(3) => print_quests(&session.completed_quests()),
                Some(choice @ 4..=7) => {
                    let Some(quest_id) = self.console.prompt("Enter quest ID: ")? else {
                        return Ok(());
                    };
                    match choice {
                        4 => match session.accept_quest(&quest_id) {
                            Ok(true) => println!("Quest accepted!"),
                            Ok(false) => println!("Quest is already active."),
                            Err(e) => println!("Cannot accept quest: {}", e),
                        },
                        5 => match session.abandon_quest(&quest_id) {
                            Ok(()) => println!("Quest abandoned."),
                            Err(e) => println!("Error: {}", e),
                        },
                        6 => match session.complete_quest(&quest_id) {
                            Ok(rewards) => println!(
                                "Quest completed! Gained {} XP and {} gold.",
                                rewards.xp, rewards.gold
                            ),
                            Err(e) => println!("Error: {}", e),
                        },
                        _ => match session.prerequisite_chain(&quest_id) {
                            Ok(chain) => {
                                let titles: Vec<&str> = chain.iter().map(|q| q.title.as_str()).collect();
                                println!("{}", titles.join(" -> "));
                            }
                            Err(e) => println!("Error: {}", e),
                        },
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn explore(&mut self, session: &mut GameSession) {
        println!("\nYou venture out...");
        match session.explore(&mut self.console, &mut self.rng) {
            Ok(result) => match result.outcome {
                CombatOutcome::PlayerVictory => {
                    println!("\nVICTORY!");
                    println!(
                        "Gained {} XP and {} gold. (Level {}, {} gold)",
                        result.xp_gained, result.gold_gained, session.character.level, session.character.gold
                    );
                }
                CombatOutcome::Escaped => println!("\nYou ran away safely."),
                CombatOutcome::EnemyVictory => println!("\nDEFEAT!"),
            },
            Err(e) => println!("You cannot fight: {}", e),
        }
    }

    fn shop(&mut self, session: &mut GameSession) -> Result<()> {
        println!("\n=== ITEM SHOP ===");
        println!("Your Gold: {}", session.character.gold);
        for (id, item) in &session.items {
            println!(
                "- {} ({}): {} gold, effect {} (ID: {})",
                item.name, item.kind, item.cost, item.effect, id
            );
        }

        println!("\n1. Buy Item");
        println!("2. Sell Item");
        println!("3. Back");

        match self.console.choose("Choice: ", 3)? {
            Some(1) => {
                let Some(item_id) = self.console.prompt("Enter item ID to buy: ")? else {
                    return Ok(());
                };
                match session.purchase(&item_id) {
                    Ok(()) => println!("Purchase successful!"),
                    Err(e) => println!("Purchase failed: {}", e),
                }
            }
            Some(2) => {
                let Some(item_id) = self.console.prompt("Enter item ID to sell: ")? else {
                    return Ok(());
                };
                match session.sell(&item_id) {
                    Ok(gold) => println!("Sold for {} gold.", gold),
                    Err(e) => println!("Sale failed: {}", e),
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn show_stats(session: &GameSession) {
    let c = &session.character;
    println!("\n=== STATS: {} ===", c.name);
    println!("Class: {}", c.archetype);
    println!("Level: {}", c.level);
    println!("XP: {}/{}", c.experience, c.xp_to_next_level());
    println!("Health: {}/{}", c.health, c.max_health);
    println!("Strength: {}", c.strength);
    println!("Magic: {}", c.magic);
    println!("Gold: {}", c.gold);

    for (label, item_id) in [("Weapon", c.equipped_weapon()), ("Armor", c.equipped_armor())] {
        if let Some(id) = item_id {
            let name = session.item(id).map(|item| item.name.as_str()).unwrap_or(id);
            println!("{}: {}", label, name);
        }
    }

    let rewards = session.total_rewards_earned();
    println!(
        "Quests: {} active, {} completed ({:.0}%), {} XP and {} gold earned",
        c.active_quests.len(),
        c.completed_quests.len(),
        session.completion_percentage(),
        rewards.xp,
        rewards.gold
    );
}

fn print_quests(quests: &[&QuestDefinition]) {
    if quests.is_empty() {
        println!("(none)");
        return;
    }
    for quest in quests {
        println!(
            "- [{}] {} (level {}, {} XP, {} gold, requires {})",
            quest.id, quest.title, quest.required_level, quest.reward_xp, quest.reward_gold, quest.prerequisite
        );
        if !quest.description.is_empty() {
            println!("    {}", quest.description);
        }
    }
}
