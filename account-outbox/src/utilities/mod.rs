// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

pub mod guarded;
