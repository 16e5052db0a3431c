use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 编程语言枚举（取值为评测服务的语言 ID）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript (Node 12.14.0)
    JavaScript = 63,
    /// TypeScript (3.7.4)
    TypeScript = 74,
    /// C++ (GCC 9.2.0)
    Cpp = 54,
    /// C (GCC 9.2.0)
    C = 50,
    /// Java (OpenJDK 13.0.1)
    Java = 62,
    /// Python (3.8.1)
    Python = 71,
    /// SQL (SQLite 3.27.2)
    Sql = 82,
}

/// 名称 / 别名 → 语言
static LANGUAGE_NAMES: phf::Map<&'static str, Language> = phf_map! {
    "javascript" => Language::JavaScript,
    "js" => Language::JavaScript,
    "node" => Language::JavaScript,
    "typescript" => Language::TypeScript,
    "ts" => Language::TypeScript,
    "cpp" => Language::Cpp,
    "c++" => Language::Cpp,
    "c" => Language::C,
    "java" => Language::Java,
    "python" => Language::Python,
    "py" => Language::Python,
    "sql" => Language::Sql,
    "sqlite" => Language::Sql,
};

impl Language {
    /// 平台默认允许的全部语言
    pub const ALL: [Language; 7] = [
        Language::Cpp,
        Language::C,
        Language::Java,
        Language::Python,
        Language::JavaScript,
        Language::Sql,
        Language::TypeScript,
    ];

    /// 获取评测服务语言 ID
    pub fn id(self) -> u32 {
        self as u32
    }

    /// 获取标准名称
    pub fn key(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Java => "java",
            Language::Python => "python",
            Language::Sql => "sql",
        }
    }

    /// 获取显示名称
    pub fn display_name(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript (Node 12.14.0)",
            Language::TypeScript => "TypeScript (3.7.4)",
            Language::Cpp => "C++ (GCC 9.2.0)",
            Language::C => "C (GCC 9.2.0)",
            Language::Java => "Java (OpenJDK 13.0.1)",
            Language::Python => "Python (3.8.1)",
            Language::Sql => "SQL (SQLite 3.27.2)",
        }
    }

    /// 编辑器语法模式
    pub fn editor_mode(self) -> &'static str {
        match self {
            Language::Cpp | Language::C => "c_cpp",
            other => other.key(),
        }
    }

    /// 从语言 ID 解析
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            63 => Some(Language::JavaScript),
            74 => Some(Language::TypeScript),
            54 => Some(Language::Cpp),
            50 => Some(Language::C),
            62 => Some(Language::Java),
            71 => Some(Language::Python),
            82 => Some(Language::Sql),
            _ => None,
        }
    }

    /// 从名称或别名解析（忽略大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        LANGUAGE_NAMES
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    /// 新建代码时的默认示例
    pub fn default_code(self) -> &'static str {
        match self {
            Language::JavaScript => {
                "// JavaScript Example\nfunction greet(name) {\n  console.log(`Hello, ${name}!`);\n}\n\ngreet(\"World\");"
            }
            Language::TypeScript => {
                "// TypeScript Example\nfunction greet(name: string): void {\n  console.log(`Hello, ${name}!`);\n}\n\ngreet(\"World\");"
            }
            Language::Cpp => {
                "// C++ Example\n#include <iostream>\n#include <string>\n\nint main() {\n    std::string name = \"World\";\n    std::cout << \"Hello, \" << name << \"!\" << std::endl;\n    return 0;\n}"
            }
            Language::C => {
                "// C Example\n#include <stdio.h>\n\nint main() {\n    char name[] = \"World\";\n    printf(\"Hello, %s!\\n\", name);\n    return 0;\n}"
            }
            Language::Java => {
                "// Java Example\npublic class Main {\n    public static void main(String[] args) {\n        String name = \"World\";\n        System.out.println(\"Hello, \" + name + \"!\");\n    }\n}"
            }
            Language::Python => {
                "# Python Example\ndef greet(name):\n    print(f\"Hello, {name}!\")\n\nif __name__ == \"__main__\":\n    greet(\"World\")"
            }
            Language::Sql => {
                "-- SQL Example\nCREATE TABLE users (\n    id INT PRIMARY KEY,\n    name VARCHAR(100) NOT NULL\n);\n\nINSERT INTO users (id, name) VALUES (1, 'John Doe');\n\nSELECT * FROM users;"
            }
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
