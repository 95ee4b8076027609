//! 集成测试公共模块

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 在临时目录中创建测试数据文件
pub fn create_test_file(
    dir: &TempDir,
    filename: &str,
    content: &str,
) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}

/// CSV 表头
#[allow(dead_code)]
pub const CSV_HEADER: &str =
    "fecha,producto,categoria,precio_unitario,cantidad,descuento";

/// 构造标准销售 CSV 内容：30 个数据行，总数量 171，
/// 总销售额约 24400.04。
#[allow(dead_code)]
pub fn sample_csv_content() -> String {
    let mut content = String::from(CSV_HEADER);
    content.push('\n');

    let products = ["Teclado", "Monitor", "Raton"];
    let categories = ["Electronica", "Oficina"];
    for i in 0..29 {
        content.push_str(&format!(
            "2024-01-{:02},{},{},5.50,5,0\n",
            (i % 28) + 1,
            products[i % products.len()],
            categories[i % categories.len()],
        ));
    }
    // 大额行，把总量补到 171
    content
        .push_str("2024-02-15,Portatil,Electronica,907.79,26,0\n");
    content
}

/// 含多种错误行的销售 CSV：价格非数值、数量为空、负价格、折扣越界
#[allow(dead_code)]
pub fn corrupt_csv_content() -> String {
    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for i in 0..7 {
        content.push_str(&format!(
            "2024-03-{:02},Lampara,Hogar,19.99,2,5\n",
            i + 1
        ));
    }
    content.push_str("2024-03-08,Silla,Hogar,ERROR,2,0\n"); // 价格非数值
    content.push_str("2024-03-09,Mesa,Hogar,120.0,,0\n"); // 数量为空
    content.push_str("2024-03-10,Sofa,Hogar,-15.0,1,0\n"); // 负价格
    content.push_str("2024-03-11,Cama,Hogar,300.0,1,150\n"); // 折扣越界
    content
}

/// 标准用户/会话 JSON 内容
#[allow(dead_code)]
pub const SAMPLE_JSON_CONTENT: &str = r#"{
  "usuarios": [
    {"id": 1, "nombre": "Ana", "email": "ana@example.com", "activo": true,
     "ultimo_acceso": "2024-03-01T09:00:00"},
    {"id": 2, "nombre": "Luis", "email": "luis@example.com", "activo": true},
    {"id": 3, "nombre": "Eva", "email": "eva@example.com", "activo": false}
  ],
  "sesiones": [
    {"usuario_id": 1, "inicio": "2024-03-01T10:00:00",
     "duracion_segundos": 300, "paginas_visitadas": 4,
     "acciones": ["login", "search", "logout"]},
    {"usuario_id": 2, "inicio": "2024-03-01T10:30:00",
     "duracion_segundos": 120, "paginas_visitadas": 2,
     "acciones": ["login"]},
    {"usuario_id": 3, "inicio": "2024-03-01T15:00:00"}
  ]
}"#;

/// 标准应用日志内容（全部行合法）
#[allow(dead_code)]
pub const SAMPLE_LOG_CONTENT: &str = "\
2024-03-15 09:00:01 [INFO] [app] service started
2024-03-15 09:05:12 [DEBUG] [app] cache warmed
2024-03-15 10:12:45 [WARN] [auth] token close to expiry
2024-03-15 10:13:02 [ERROR] [db] connection timeout on primary
2024-03-15 11:00:00 [FATAL] [db] deadlock detected in txn 42
";

/// 部分成功日志内容：两行合法、一行坏行
#[allow(dead_code)]
pub const PARTIAL_LOG_CONTENT: &str = "\
2024-03-15 09:00:01 [INFO] [app] service started
this line is bad
2024-03-15 10:13:02 [ERROR] [db] connection timeout on primary
";

/// 标准产品目录 XML 内容
#[allow(dead_code)]
pub const SAMPLE_XML_CONTENT: &str = r#"<catalog>
  <metadata>
    <generated>2024-03-01</generated>
    <source>erp</source>
  </metadata>
  <products>
    <product id="p1" currency="EUR">
      <name>Teclado</name>
      <category>Perifericos</category>
      <price>49.90</price>
      <stock>12</stock>
      <supplier>Acme</supplier>
    </product>
    <product id="p2">
      <name>Monitor</name>
      <category>Pantallas</category>
      <price>199.00</price>
      <stock>3</stock>
      <supplier>Beta</supplier>
    </product>
    <product id="p3">
      <name>Raton</name>
      <category>Perifericos</category>
      <price>19.90</price>
      <stock>40</stock>
      <supplier>Acme</supplier>
    </product>
  </products>
</catalog>"#;

/// 创建一个"四类型各一个文件"的数据目录
#[allow(dead_code)]
pub fn create_mixed_dir(dir: &TempDir) -> Vec<PathBuf> {
    vec![
        create_test_file(dir, "ventas.csv", &sample_csv_content()),
        create_test_file(dir, "usuarios.json", SAMPLE_JSON_CONTENT),
        create_test_file(dir, "app.log", SAMPLE_LOG_CONTENT),
        create_test_file(dir, "catalogo.xml", SAMPLE_XML_CONTENT),
    ]
}

/// 验证文件存在且非空
#[allow(dead_code)]
pub fn verify_output_file_exists(path: &Path) -> bool {
    path.exists()
        && fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
