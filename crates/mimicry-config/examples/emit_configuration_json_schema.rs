use mimicry_config::configuration_json_schema;

fn main() {
    let schema = configuration_json_schema();
    let json = serde_json::to_string_pretty(&schema).expect("serialize configuration json schema");
    println!("{json}");
}
