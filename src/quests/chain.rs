//! Prerequisite chains.
//!
//! Every quest names at most one prerequisite, so the ancestry of a quest
//! is a linked list. Walking it tracks visited ids so a malformed table
//! with a loop fails instead of spinning forever.

use super::types::{QuestDefinition, QuestTable};
use crate::core::error::{GameError, GameResult};
use std::collections::HashSet;

/// Ancestry of `quest_id`, earliest ancestor first and the quest itself last.
///
/// Fails with `QuestNotFound` for an unknown id anywhere along the chain and
/// with `PrerequisiteCycle` naming the first id reached twice.
pub fn prerequisite_chain<'a>(quest_id: &str, quests: &'a QuestTable) -> GameResult<Vec<&'a QuestDefinition>> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = quest_id;

    loop {
        let (id, quest) = quests
            .get_key_value(current)
            .ok_or_else(|| GameError::QuestNotFound(current.to_string()))?;

        if !visited.insert(id.as_str()) {
            return Err(GameError::PrerequisiteCycle {
                quest_id: id.clone(),
            });
        }
        chain.push(quest);

        match quest.prerequisite.quest_id() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

/// Checks that every prerequisite in the table resolves and that no chain loops.
pub fn validate_prerequisites(quests: &QuestTable) -> GameResult<()> {
    for quest_id in quests.keys() {
        prerequisite_chain(quest_id, quests)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quests::types::Prerequisite;

    fn table(links: &[(&str, &str)]) -> QuestTable {
        links
            .iter()
            .map(|(id, prerequisite)| {
                let quest = QuestDefinition {
                    id: id.to_string(),
                    title: id.to_string(),
                    description: String::new(),
                    reward_xp: 10,
                    reward_gold: 5,
                    required_level: 1,
                    prerequisite: Prerequisite::from(prerequisite.to_string()),
                };
                (id.to_string(), quest)
            })
            .collect()
    }

    fn ids(chain: &[&QuestDefinition]) -> Vec<String> {
        chain.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn test_chain_without_prerequisite_is_itself() {
        let quests = table(&[("a", "NONE")]);
        let chain = prerequisite_chain("a", &quests).unwrap();
        assert_eq!(ids(&chain), vec!["a"]);
    }

    #[test]
    fn test_chain_earliest_first() {
        let quests = table(&[("a", "NONE"), ("b", "a"), ("c", "b")]);
        let chain = prerequisite_chain("c", &quests).unwrap();
        assert_eq!(ids(&chain), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_start_and_broken_link() {
        let quests = table(&[("b", "a")]);
        assert_eq!(
            prerequisite_chain("z", &quests),
            Err(GameError::QuestNotFound("z".into()))
        );
        assert_eq!(
            prerequisite_chain("b", &quests),
            Err(GameError::QuestNotFound("a".into()))
        );
    }

    #[test]
    fn test_cycle_detected() {
        let quests = table(&[("a", "c"), ("b", "a"), ("c", "b")]);
        assert_eq!(
            prerequisite_chain("a", &quests),
            Err(GameError::PrerequisiteCycle {
                quest_id: "a".into()
            })
        );

        let quests = table(&[("root", "loop"), ("loop", "loop")]);
        assert_eq!(
            prerequisite_chain("root", &quests),
            Err(GameError::PrerequisiteCycle {
                quest_id: "loop".into()
            })
        );
    }

    #[test]
    fn test_validate_prerequisites() {
        assert!(validate_prerequisites(&table(&[("a", "NONE"), ("b", "a")])).is_ok());
        assert!(validate_prerequisites(&QuestTable::new()).is_ok());
        assert_eq!(
            validate_prerequisites(&table(&[("a", "ghost")])),
            Err(GameError::QuestNotFound("ghost".into()))
        );
        assert!(matches!(
            validate_prerequisites(&table(&[("a", "b"), ("b", "a")])),
            Err(GameError::PrerequisiteCycle { .. })
        ));
    }
}
