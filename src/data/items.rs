use crate::shared::*;

fn material(id: &str, name: &str, description: &str, tint: [u8; 3]) -> ItemDef {
    ItemDef {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        tint,
        stackable: true,
        max_stack: 99,
    }
}

/// Tools and placeables never stack.
fn tool(id: &str, name: &str, description: &str, tint: [u8; 3]) -> ItemDef {
    ItemDef {
        stackable: false,
        max_stack: 1,
        ..material(id, name, description, tint)
    }
}

/// A seed (`seed_<base>`) and the product it grows into (`<base>`).
fn crop_pair(base: &str, name: &str, seed_tint: [u8; 3], product_tint: [u8; 3]) -> [ItemDef; 2] {
    [
        material(
            &format!("seed_{base}"),
            &format!("{name} Seed"),
            &format!("Plant to grow {}", name.to_lowercase()),
            seed_tint,
        ),
        material(base, name, &format!("Harvested {}", name.to_lowercase()), product_tint),
    ]
}

/// Populate the ItemCatalog with every item the economy can produce or drop.
pub fn populate_items(catalog: &mut ItemCatalog) {
    let base = vec![
        // ── Tools ───────────────────────────────────────────────────────
        tool("bucket_water", "Water Bucket", "A bucket full of water", [100, 170, 255]),
        tool("bucket_milk", "Milk Bucket", "A bucket of fresh milk", [240, 240, 230]),
        tool("bucket_empty", "Bucket", "An empty bucket", [180, 180, 180]),
        tool("hoe_wood_improv", "Makeshift Wooden Hoe", "Basic tilling tool", [160, 120, 70]),
        tool("hoe_wood", "Wooden Hoe", "Tilling tool", [150, 110, 60]),
        tool("hoe_copper", "Copper Hoe", "Sturdy tilling tool", [200, 110, 70]),
        tool("hoe_iron", "Iron Hoe", "Tilling tool", [140, 140, 150]),
        tool("hoe_steel", "Steel Hoe", "Advanced tilling tool", [120, 130, 140]),
        tool("pick_wood_improv", "Makeshift Wooden Pick", "Basic pick", [160, 120, 70]),
        tool("pick_copper", "Copper Pick", "For light mining", [210, 120, 80]),
        tool("pick_iron", "Iron Pick", "For mining", [140, 140, 150]),
        tool("pick_steel", "Steel Pick", "For heavy mining", [120, 130, 140]),
        tool("knife_wood", "Wooden Knife", "Basic knife", [160, 120, 70]),
        tool("knife_stone", "Stone Knife", "Crude knife", [120, 120, 120]),
        tool("knife_iron", "Iron Knife", "Tough knife", [140, 140, 150]),
        tool("knife_steel", "Steel Knife", "Sharp knife", [120, 130, 140]),
        tool("shovel_wood", "Wooden Shovel", "For digging", [160, 120, 70]),
        tool("shovel_stone", "Stone Shovel", "For digging", [120, 120, 120]),
        tool("shovel_iron", "Iron Shovel", "For digging", [140, 140, 150]),
        tool("shovel_steel", "Steel Shovel", "For digging", [120, 130, 140]),
        tool("hoehead_weeder_wood", "Wooden Weeder", "Weed control", [160, 120, 70]),
        tool("hoehead_weeder_iron", "Iron Weeder", "Weed control", [140, 140, 150]),
        tool("hoehead_weeder_copper", "Copper Weeder", "Weed control", [200, 110, 70]),
        tool("rake_wood", "Wooden Rake", "Levels the surface", [160, 120, 70]),
        tool("rake_iron", "Iron Rake", "Levels the surface", [140, 140, 150]),
        tool("rake_copper", "Copper Rake", "Levels the surface", [200, 110, 70]),
        tool("pruner", "Pruning Shears", "Trims branches and stems", [110, 150, 120]),
        tool("saw_copper", "Copper Saw", "Cuts wood", [200, 120, 70]),
        tool("saw_iron", "Iron Saw", "Cuts wood", [140, 140, 150]),
        tool("saw_steel", "Steel Saw", "Cuts wood", [120, 130, 140]),
        tool("wheelbarrow", "Wheelbarrow", "Hauls heavy loads", [90, 90, 90]),
        tool("basket", "Basket", "Carries gathered goods", [170, 130, 90]),
        // ── Placeables ──────────────────────────────────────────────────
        tool("furnace", "Furnace", "Smelts ore and fires clay", [100, 100, 110]),
        tool("workbench", "Workbench", "Crafting table", [120, 90, 60]),
        tool("chest_wood", "Wooden Chest", "Plain storage", [125, 90, 60]),
        tool("bed", "Bed", "For sleeping", [200, 180, 170]),
        tool("anvil", "Anvil", "Forging and shaping", [90, 95, 110]),
        // ── Raw materials ───────────────────────────────────────────────
        material("leaves", "Leaves", "Plant biomass", [90, 140, 70]),
        material("wood_branch", "Branch", "A small branch", [150, 110, 70]),
        material("log_small", "Small Log", "A short log section", [120, 85, 50]),
        material("log", "Log", "A log ready for processing", [110, 80, 45]),
        material("rock", "Rock", "Common stone", [120, 120, 120]),
        material("clay", "Clay", "Clay for pottery", [180, 120, 90]),
        material("ore_coal", "Coal", "A lump of coal", [40, 40, 40]),
        material("ore_iron", "Iron Ore", "Raw iron", [110, 110, 115]),
        material("ore_copper", "Copper Ore", "Raw copper", [200, 120, 70]),
        material("ore_steel", "Scrap Steel", "Salvaged alloy", [125, 130, 135]),
        material("carbon_element", "Carbon", "Pure carbon", [60, 60, 60]),
        material("bone", "Bone", "An animal bone", [230, 230, 210]),
        material("salt", "Salt", "Sodium chloride", [235, 235, 235]),
        material("honey", "Honey", "Sweet bee product", [240, 200, 80]),
        material("honeycomb", "Honeycomb", "Wax and honey", [220, 180, 70]),
        material("honeycomb_fragment", "Honeycomb Fragment", "A waxy fragment", [210, 170, 65]),
        material("chicken_egg", "Chicken Egg", "Food or ingredient", [245, 245, 210]),
        // ── Zone soils ──────────────────────────────────────────────────
        material("soil_alaska", "Boreal Soil", "Matanuska-Susitna topsoil", [110, 120, 95]),
        material("soil_ppr", "Prairie Soil", "Prairie Pothole topsoil", [120, 115, 85]),
        material("soil_michigan", "Woodland Soil", "Leelanau topsoil", [105, 125, 95]),
        // ── Processed goods ─────────────────────────────────────────────
        material("planks", "Planks", "Sawn boards", [160, 120, 70]),
        material("rope", "Rope", "Braided rope", [200, 180, 120]),
        material("rope_fiber", "Cord", "Twisted plant fibre", [200, 180, 120]),
        material("stake_wood", "Wooden Stakes", "For fencing and support", [150, 110, 70]),
        material("stake_iron", "Iron Stakes", "For fencing and support", [140, 140, 150]),
        material("glass", "Glass", "Fired glass", [200, 240, 255]),
        material("jar_small", "Small Jar", "Glass container", [190, 230, 250]),
        material("jar_medium", "Medium Jar", "Glass container", [175, 220, 245]),
        material("jar_large", "Large Jar", "Glass container", [160, 210, 240]),
        material("bowl_wood", "Wooden Bowl", "Everyday bowl", [150, 110, 70]),
        material("bowl_stone", "Stone Bowl", "Heavy bowl", [130, 130, 130]),
        material("bone_meal", "Bone Meal", "Phosphorus soil amendment", [220, 210, 180]),
        material("fert_1", "Basic Fertilizer", "Basic fertilizer", [160, 140, 90]),
        material("fert_2", "Balanced Fertilizer", "Balanced fertilizer", [150, 160, 90]),
        material("fert_3", "Rich Fertilizer", "High-yield fertilizer", [140, 170, 90]),
        material("candle", "Candle", "A simple light", [255, 240, 180]),
        // ── Meat ────────────────────────────────────────────────────────
        material("meat_chicken_breast", "Chicken Breast", "Poultry", [225, 120, 110]),
        material("meat_beef_steak", "Beef Steak", "Beef", [190, 60, 60]),
        material("meat_pork_chop", "Pork Chop", "Pork", [230, 140, 140]),
        material("meat_fish_fillet", "Fish Fillet", "Fish", [190, 210, 230]),
        // ── Metalwork & electronics ─────────────────────────────────────
        material("iron_ingot", "Iron Ingot", "Refined metal", [150, 150, 160]),
        material("steel_ingot", "Steel Ingot", "Refined alloy", [130, 140, 150]),
        material("copper_ingot", "Copper Ingot", "Refined metal", [210, 120, 70]),
        material("aluminum_ingot", "Aluminum Ingot", "Light metal", [200, 200, 210]),
        material("titanium_ingot", "Titanium Ingot", "High-strength metal", [170, 180, 190]),
        material("nickel_ingot", "Nickel Ingot", "Corrosion-resistant metal", [160, 170, 180]),
        material("cobalt_ingot", "Cobalt Ingot", "Hard metal", [120, 130, 170]),
        material("flux", "Flux", "Aids welding and smelting", [200, 180, 120]),
        material("welding_rod", "Welding Rod", "Filler metal", [150, 150, 160]),
        material("crucible_ceramic", "Ceramic Crucible", "Holds molten metal", [180, 150, 120]),
        material("bearing", "Bearing", "Machine element", [110, 110, 120]),
        material("gear", "Gear", "Mechanical transmission", [100, 100, 110]),
        material("belt", "Belt", "Belt drive", [80, 80, 80]),
        material("copper_wire", "Copper Wire", "Electrical conductor", [210, 120, 70]),
        material("pcb", "Circuit Board", "Printed circuit board", [70, 140, 100]),
        material("microcontroller", "Microcontroller", "Drives sensors and actuators", [90, 110, 130]),
        material("battery", "Battery", "Stores electricity", [80, 80, 90]),
        material("solar_panel", "Solar Panel", "Generates electricity", [30, 60, 120]),
        material("resistor", "Resistor", "Electronic component", [160, 120, 80]),
        material("capacitor", "Capacitor", "Electronic component", [100, 140, 180]),
        material("transistor", "Transistor", "Semiconductor component", [120, 120, 160]),
        material("silicon_wafer", "Silicon Wafer", "Semiconductor substrate", [200, 200, 200]),
        // ── Field instruments ───────────────────────────────────────────
        material("soil_ph_meter", "Soil pH Meter", "Portable pH probe", [120, 180, 120]),
        material("soil_moisture_sensor", "Soil Moisture Sensor", "Volumetric probe", [120, 160, 200]),
        material("thermometer", "Thermometer", "Measures temperature", [200, 200, 220]),
        material("hygrometer", "Hygrometer", "Measures air humidity", [190, 210, 230]),
        material("anemometer", "Anemometer", "Measures wind speed", [170, 190, 210]),
    ];

    let crops = [
        crop_pair("corn", "Corn", [240, 220, 120], [250, 210, 60]),
        crop_pair("potato", "Potato", [240, 210, 110], [210, 170, 90]),
        crop_pair("cabbage", "Cabbage", [190, 220, 150], [120, 190, 120]),
        crop_pair("carrot", "Carrot", [240, 170, 90], [230, 120, 50]),
        crop_pair("spring_barley", "Spring Barley", [210, 210, 160], [200, 180, 120]),
        crop_pair("raspberry_ht", "High-Tunnel Raspberry", [230, 150, 170], [210, 70, 110]),
        crop_pair("kale", "Kale", [170, 210, 170], [110, 160, 110]),
        crop_pair("spring_wheat", "Spring Wheat", [230, 210, 150], [220, 200, 120]),
        crop_pair("sunflower", "Sunflower", [240, 210, 70], [230, 200, 60]),
        crop_pair("canola", "Canola", [215, 215, 120], [205, 205, 90]),
        crop_pair("soy", "Soybean", [200, 220, 180], [190, 210, 160]),
        crop_pair("field_pea", "Field Pea", [190, 230, 190], [130, 200, 140]),
        crop_pair("malting_barley", "Malting Barley", [210, 210, 160], [200, 180, 120]),
        crop_pair("tart_cherry", "Tart Cherry", [230, 120, 120], [210, 60, 60]),
        crop_pair("apple", "Apple", [220, 240, 170], [220, 60, 60]),
        crop_pair("blueberry", "Blueberry", [180, 200, 240], [80, 100, 200]),
        crop_pair("cold_hybrid_grape", "Cold-Hardy Grape", [190, 200, 220], [150, 100, 170]),
        crop_pair("asparagus", "Asparagus", [190, 220, 170], [110, 170, 110]),
        crop_pair("pickling_cucumber", "Pickling Cucumber", [190, 220, 180], [110, 180, 120]),
    ];

    for def in base.into_iter().chain(crops.into_iter().flatten()) {
        catalog.insert(def);
    }
}
