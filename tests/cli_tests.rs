//! Command-line tests for the `army-sheet` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CATALOGUE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalogue id="sw" name="Imperium - Space Wolves" revision="7">
  <catalogueLinks>
    <catalogueLink id="cl1" name="Imperium - Space Marines" targetId="sm" type="catalogue"/>
  </catalogueLinks>
  <sharedRules>
    <rule id="doctrines" name="Combat Doctrines">
      <description>If your Army Faction is ADEPTUS ASTARTES, at the start of your Command phase, you can select one doctrine.</description>
    </rule>
  </sharedRules>
  <sharedSelectionEntries>
    <selectionEntry id="logan" name="Logan Grimnar" type="model">
      <profiles>
        <profile id="axe" name="Axe Morkai" typeName="Melee Weapons">
          <characteristics>
            <characteristic name="Range">Melee</characteristic>
            <characteristic name="A">6</characteristic>
            <characteristic name="WS">2+</characteristic>
            <characteristic name="S">8</characteristic>
            <characteristic name="AP">-3</characteristic>
            <characteristic name="D">3</characteristic>
          </characteristics>
        </profile>
      </profiles>
      <infoLinks>
        <infoLink id="l1" name="Combat Doctrines" targetId="doctrines" type="rule"/>
      </infoLinks>
      <categoryLinks>
        <categoryLink id="c1" name="Character" targetId="char"/>
      </categoryLinks>
      <costs>
        <cost name="pts" value="110"/>
      </costs>
    </selectionEntry>
    <selectionEntry id="lancer" name="Gladiator Lancer" type="model">
      <infoLinks>
        <infoLink id="l2" name="Combat Doctrines" targetId="doctrines" type="rule"/>
      </infoLinks>
      <costs>
        <cost name="pts" value="160"/>
      </costs>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>
"#;

const ARMY_LIST: &str = "Bar Fighters (270 Points)

Space Wolves
Strike Force (2,000 Points)

CHARACTERS

Logan Grimnar (110 Points)
  • Warlord
  • 1x Axe Morkai

OTHER DATASHEETS

Gladiator Lancer (160 Points)
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Imperium - Space Wolves.cat"), CATALOGUE).unwrap();
        std::fs::write(dir.path().join("army.txt"), ARMY_LIST).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }
}

fn army_sheet() -> Command {
    Command::cargo_bin("army-sheet").unwrap()
}

#[test]
fn test_help_lists_commands() {
    army_sheet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_parse_text() {
    let fixture = Fixture::new();
    army_sheet()
        .args(["parse", &fixture.path("army.txt")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Army: Bar Fighters (270 points)"))
        .stdout(predicate::str::contains("Logan Grimnar - 110 pts [Warlord]"));
}

#[test]
fn test_parse_json_from_stdin() {
    army_sheet()
        .args(["-f", "json", "parse", "-"])
        .write_stdin(ARMY_LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""faction": "Space Wolves""#))
        .stdout(predicate::str::contains(r#""detachment": "Strike Force""#));
}

#[test]
fn test_parse_rejects_input_without_army() {
    army_sheet()
        .args(["parse", "-"])
        .write_stdin("\n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No army structure"));
}

#[test]
fn test_resolve_json_with_missing_linked_catalogue() {
    let fixture = Fixture::new();
    army_sheet()
        .args(["-f", "json", "resolve", &fixture.path("Imperium - Space Wolves.cat")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "Gladiator Lancer""#))
        .stderr(predicate::str::contains("Linked catalogue not found"));
}

#[test]
fn test_resolve_then_generate_from_json() {
    let fixture = Fixture::new();
    let resolved = fixture.path("space_wolves.json");
    army_sheet()
        .args([
            "resolve",
            &fixture.path("Imperium - Space Wolves.cat"),
            "--no-linked",
            "-o",
            &resolved,
        ])
        .assert()
        .success();

    army_sheet()
        .args(["generate", &fixture.path("army.txt"), "--catalogue", &resolved])
        .assert()
        .success()
        .stdout(predicate::str::contains("Faction abilities:"))
        .stdout(predicate::str::contains("Combat Doctrines"))
        .stdout(predicate::str::contains("1x Axe Morkai"));
}

#[test]
fn test_generate_yaml_with_catalogue_dir() {
    let fixture = Fixture::new();
    army_sheet()
        .args([
            "-f",
            "yaml",
            "generate",
            &fixture.path("army.txt"),
            "--catalogue-dir",
            &fixture.path(""),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("army_name: Bar Fighters"))
        .stdout(predicate::str::contains("name: Combat Doctrines"));
}

#[test]
fn test_generate_requires_catalogue() {
    let fixture = Fixture::new();
    army_sheet()
        .args(["generate", &fixture.path("army.txt")])
        .assert()
        .failure();
}

#[test]
fn test_generate_unknown_faction_directory() {
    let fixture = Fixture::new();
    army_sheet()
        .args(["generate", "-", "--catalogue-dir", &fixture.path("")])
        .write_stdin("Foo (100 Points)\n\nNot A Faction\n\nOTHER DATASHEETS\n\nBar (100 Points)\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not detect the faction"));
}
