use elevation_map_msg::*;
use nalgebra::Vector2;

fn main() {
    let layout = GridLayout::row_major(10, 10);
    let map_result = GridMap::new(Vector2::new(1.0, 1.0), 0.1, Vector2::new(0.0, 0.0), layout);
    let alignment = Alignment::default();

    match map_result {
        Ok(map) => {
            let map = map.with_buffer_start_index(Vector2::new(3, 7));
            println!("{}", map);
            println!("  Alignment: {}", alignment);

            println!("\nIndex to position:");
            for index in [Vector2::new(0, 0), Vector2::new(3, 7), Vector2::new(9, 9), Vector2::new(10, 0)] {
                match map.index_to_position(index, &alignment) {
                    Some(p) => println!("  ({:>2}, {:>2}) -> ({:.2}, {:.2}), flat offset {:?}", index.x, index.y, p.x, p.y, map.flatten_index(index)),
                    None => println!("  ({:>2}, {:>2}) -> outside buffer", index.x, index.y),
                }
            }

            println!("\nPosition to index:");
            for position in [Vector2::new(0.45, 0.45), Vector2::new(-0.12, 0.31), Vector2::new(0.8, 0.0)] {
                match map.position_to_index(&position, &alignment) {
                    Some(i) => println!("  ({:.2}, {:.2}) -> ({}, {})", position.x, position.y, i.x, i.y),
                    None => println!("  ({:.2}, {:.2}) -> outside map", position.x, position.y),
                }
            }

            let color = pack_color(0x3399cc);
            println!("\nColor 0x3399cc -> {:?} -> 0x{:06x}", color.as_slice(), unpack_color(&color));
        }
        Err(e) => {
            eprintln!("Failed to create grid map: {}", e);
        }
    }
}
